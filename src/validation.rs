use crate::error::{AppError, AppResult};
use crate::schemas::{Event, NewEvent, NewExpense, UserNick};

const DEFAULT_EVENT_NAME: &str = "New Event";

pub fn event_fields(new_event: NewEvent) -> (String, String) {
    let name = new_event
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_EVENT_NAME.to_string());
    let description = new_event.description.unwrap_or_default();
    (name, description)
}

pub fn participant_name(name: &str) -> AppResult<UserNick> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("Name is required".to_string()));
    }
    Ok(name.to_string())
}

/// Cleans up an expense before it is stored. `split_with` keeps its first
/// occurrence of each name. With `strict` set, the payer and every split
/// member must already be in the event.
pub fn expense(new_expense: NewExpense, event: &Event, strict: bool) -> AppResult<NewExpense> {
    let description = new_expense.description.trim().to_string();
    let paid_by = new_expense.paid_by.trim().to_string();
    if description.is_empty() || paid_by.is_empty() {
        return Err(AppError::Validation(
            "Description, amount, and paid_by are required".to_string(),
        ));
    }
    if !new_expense.amount.is_finite() || new_expense.amount <= 0.0 {
        return Err(AppError::Validation("Invalid amount".to_string()));
    }

    let mut split_with: Vec<UserNick> = Vec::with_capacity(new_expense.split_with.len());
    for name in new_expense.split_with {
        if !split_with.contains(&name) {
            split_with.push(name);
        }
    }

    if strict {
        if let Some(unknown) = std::iter::once(&paid_by)
            .chain(split_with.iter())
            .find(|name| !event.has_participant(name))
        {
            return Err(AppError::UnknownParticipant(unknown.clone()));
        }
    }

    Ok(NewExpense {
        description,
        amount: new_expense.amount,
        paid_by,
        split_with,
    })
}
