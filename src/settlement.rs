use serde::Serialize;

use crate::balance::Balances;
use crate::schemas::UserNick;

/// Balances within this distance of zero count as settled.
pub const SETTLED_TOLERANCE: f64 = 0.01;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Settlement {
    pub from: UserNick,
    pub to: UserNick,
    pub amount: f64,
}

fn round_to_2_decimals(n: f64) -> f64 {
    (n * 100.0).round() / 100.0
}

/// Greedily pairs creditors with debtors, in the order they appear in
/// `balances`, until every residual is inside the tolerance band.
///
/// This is not a minimum-transfer solver: each creditor walks the debtors
/// in order and takes `min(credit, debt)` from each, which is at most
/// `creditors + debtors - 1` transfers but not always the fewest possible.
pub fn calculate_settlements(balances: &Balances) -> Vec<Settlement> {
    let creditors = balances.iter().filter(|(_, b)| **b > SETTLED_TOLERANCE);
    let mut debtors: Vec<(&UserNick, f64)> = balances
        .iter()
        .filter(|(_, b)| **b < -SETTLED_TOLERANCE)
        .map(|(name, b)| (name, *b))
        .collect();

    let mut settlements = Vec::new();
    for (creditor, &credit) in creditors {
        let mut credit_remaining = credit;
        for (debtor, debt_remaining) in debtors.iter_mut() {
            if credit_remaining <= SETTLED_TOLERANCE {
                break;
            }
            if debt_remaining.abs() <= SETTLED_TOLERANCE {
                continue;
            }
            let transfer = credit_remaining.min(debt_remaining.abs());
            settlements.push(Settlement {
                from: (*debtor).clone(),
                to: creditor.clone(),
                amount: round_to_2_decimals(transfer),
            });
            credit_remaining -= transfer;
            *debt_remaining += transfer;
        }
    }

    settlements.retain(|s| s.amount > SETTLED_TOLERANCE);
    tracing::debug!(count = settlements.len(), "computed settlements");
    settlements
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::balance::calculate_balances;
    use crate::schemas::Expense;
    use chrono::Utc;
    use indexmap::IndexMap;
    use proptest::prelude::*;

    fn balances(entries: &[(&str, f64)]) -> Balances {
        entries.iter().map(|(n, b)| (n.to_string(), *b)).collect()
    }

    fn settlement(from: &str, to: &str, amount: f64) -> Settlement {
        Settlement {
            from: from.to_string(),
            to: to.to_string(),
            amount,
        }
    }

    #[test]
    fn empty_balances_need_no_settlement() {
        assert!(calculate_settlements(&Balances::new()).is_empty());
        assert!(calculate_settlements(&balances(&[("A", 0.0), ("B", 0.0)])).is_empty());
    }

    #[test]
    fn one_creditor_two_debtors() {
        let result = calculate_settlements(&balances(&[("A", 20.0), ("B", -10.0), ("C", -10.0)]));
        assert_eq!(
            result,
            vec![settlement("B", "A", 10.0), settlement("C", "A", 10.0)]
        );
    }

    #[test]
    fn two_creditors_share_a_debtor() {
        let result = calculate_settlements(&balances(&[
            ("A", 7.0),
            ("B", 3.0),
            ("C", -4.0),
            ("D", -6.0),
        ]));
        assert_eq!(
            result,
            vec![
                settlement("C", "A", 4.0),
                settlement("D", "A", 3.0),
                settlement("D", "B", 3.0),
            ]
        );
    }

    #[test]
    fn tolerance_band_counts_as_settled() {
        let result = calculate_settlements(&balances(&[("A", 0.005), ("B", -0.005)]));
        assert!(result.is_empty());

        let result = calculate_settlements(&balances(&[("A", 5.005), ("B", -5.0), ("C", -0.005)]));
        assert_eq!(result, vec![settlement("B", "A", 5.0)]);
    }

    #[test]
    fn amounts_are_rounded_to_cents() {
        let result = calculate_settlements(&balances(&[
            ("A", 6.666666),
            ("B", -3.333333),
            ("C", -3.333333),
        ]));
        assert_eq!(
            result,
            vec![settlement("B", "A", 3.33), settlement("C", "A", 3.33)]
        );
    }

    #[test]
    fn input_is_not_modified() {
        let input = balances(&[("A", 10.0), ("B", -10.0)]);
        let copy = input.clone();
        calculate_settlements(&input);
        assert_eq!(input, copy);
    }

    fn expense(amount: f64, paid_by: &str, split_with: Vec<String>) -> Expense {
        Expense {
            id: uuid::Uuid::new_v4().to_string(),
            description: "test".to_string(),
            amount,
            paid_by: paid_by.to_string(),
            split_with,
            created_at: Utc::now(),
        }
    }

    proptest! {
        #[test]
        fn settlements_zero_every_balance(
            member_count in 1usize..=6,
            amounts in prop::collection::vec(1u32..=1_000, 0..=20),
            payer_indexes in prop::collection::vec(0usize..=5, 20),
            split_masks in prop::collection::vec(0usize..=63, 20),
        ) {
            let roster: Vec<UserNick> = (0..member_count).map(|i| format!("member{i}")).collect();
            let expenses: Vec<Expense> = amounts
                .iter()
                .enumerate()
                .map(|(idx, units)| {
                    let split = roster
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| split_masks[idx] & (1 << i) != 0)
                        .map(|(_, name)| name.clone())
                        .collect();
                    expense(*units as f64, &roster[payer_indexes[idx] % member_count], split)
                })
                .collect();

            let mut remaining = calculate_balances(&roster, &expenses);
            let settlements = calculate_settlements(&remaining);
            let mut touched: IndexMap<&str, u32> = IndexMap::new();
            for s in &settlements {
                prop_assert!(s.amount > SETTLED_TOLERANCE);
                prop_assert_ne!(&s.from, &s.to);
                remaining[&s.to] -= s.amount;
                remaining[&s.from] += s.amount;
                *touched.entry(s.to.as_str()).or_default() += 1;
                *touched.entry(s.from.as_str()).or_default() += 1;
            }
            // Each transfer is rounded to the cent, so a participant can
            // drift by half a cent per transfer they take part in.
            for (name, balance) in &remaining {
                let transfers = touched.get(name.as_str()).copied().unwrap_or_default();
                let slack = SETTLED_TOLERANCE + 0.005 * transfers as f64;
                prop_assert!(balance.abs() <= slack, "{} left at {}", name, balance);
            }
        }
    }
}
