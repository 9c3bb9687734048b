use indexmap::IndexMap;

use crate::schemas::{Event, Expense, UserNick};

/// Net balance per participant, in roster order. Positive means the
/// participant is owed money, negative means they owe.
pub type Balances = IndexMap<UserNick, f64>;

/// The people an expense is shared between, each named once. An empty
/// split means everyone currently in the event, so roster changes also
/// change old expenses.
pub fn resolve_split<'a>(expense: &'a Expense, participants: &'a [UserNick]) -> Vec<&'a UserNick> {
    let names: &[UserNick] = if expense.split_with.is_empty() {
        participants
    } else {
        &expense.split_with
    };
    let mut split: Vec<&UserNick> = Vec::with_capacity(names.len());
    for name in names {
        if !split.contains(&name) {
            split.push(name);
        }
    }
    split
}

pub fn compute_balance_from_event(event: &Event) -> Balances {
    calculate_balances(&event.participants, &event.expenses)
}

/// Payers are credited the full amount and every member of the resolved
/// split is debited an equal share. Names that are not participants are
/// skipped, so the balances only sum to zero when every name is known.
pub fn calculate_balances(participants: &[UserNick], expenses: &[Expense]) -> Balances {
    let mut balance: Balances = participants.iter().map(|p| (p.clone(), 0.0)).collect();

    for expense in expenses {
        let split = resolve_split(expense, participants);
        if split.is_empty() {
            continue;
        }
        let amount_per_receiver = expense.amount / split.len() as f64;

        match balance.get_mut(&expense.paid_by) {
            Some(v) => *v += expense.amount,
            None => tracing::debug!(payer = %expense.paid_by, "ignoring unknown payer"),
        }
        for receiver in split {
            match balance.get_mut(receiver) {
                Some(v) => *v -= amount_per_receiver,
                None => tracing::debug!(%receiver, "ignoring unknown split member"),
            }
        }
    }
    balance
}
