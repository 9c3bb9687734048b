use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::balance::Balances;
use crate::settlement::Settlement;

pub type UserNick = String;

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Event {
    pub id: String,
    pub name: String,
    pub description: String,
    pub participants: Vec<UserNick>,
    pub expenses: Vec<Expense>,
    pub created_at: DateTime<Utc>,
}

impl Event {
    pub fn new(name: String, description: String) -> Self {
        Event {
            id: uuid::Uuid::new_v4().to_string(),
            name,
            description,
            participants: vec![],
            expenses: vec![],
            created_at: Utc::now(),
        }
    }

    pub fn has_participant(&self, name: &str) -> bool {
        self.participants.iter().any(|p| p == name)
    }

    /// Drops the participant, every expense they paid, and their name from
    /// the remaining splits. Returns false if they were not in the event.
    pub fn remove_participant(&mut self, name: &str) -> bool {
        let Some(position) = self.participants.iter().position(|p| p == name) else {
            return false;
        };
        self.participants.remove(position);
        self.expenses.retain(|e| e.paid_by != name);
        for expense in &mut self.expenses {
            expense.split_with.retain(|s| s != name);
        }
        true
    }

    pub fn total_expenses(&self) -> f64 {
        self.expenses.iter().map(|e| e.amount).sum()
    }
}

/// A single payment made by `paid_by` on behalf of `split_with`.
///
/// An empty `split_with` is stored as such; it only becomes "everyone" when
/// balances are computed, see [`crate::balance::resolve_split`].
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Expense {
    pub id: String,
    pub description: String,
    pub amount: f64,
    pub paid_by: UserNick,
    pub split_with: Vec<UserNick>,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct NewEvent {
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Participant {
    #[serde(default)]
    pub name: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct NewExpense {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub paid_by: String,
    #[serde(default)]
    pub split_with: Vec<UserNick>,
}

#[derive(Clone, Debug, Serialize)]
pub struct EventSummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<&Event> for EventSummary {
    fn from(event: &Event) -> Self {
        EventSummary {
            id: event.id.clone(),
            name: event.name.clone(),
            description: event.description.clone(),
            created_at: event.created_at,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Calculation {
    pub balances: Balances,
    pub settlements: Vec<Settlement>,
}

#[derive(Clone, Debug, Serialize)]
pub struct EventDetails {
    pub id: String,
    pub name: String,
    pub description: String,
    pub users: Vec<Participant>,
    pub expenses: Vec<Expense>,
    pub balances: Balances,
    pub settlements: Vec<Settlement>,
    pub total_expenses: f64,
    pub created_at: DateTime<Utc>,
}
