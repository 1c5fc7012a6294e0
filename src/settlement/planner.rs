//! Debt netting: computing a small set of transfers that clears a set of
//! signed balances.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap};

use super::{
    errors::{SettlementError, SettlementResult},
    models::SettlementSuggestion,
};
use crate::{game::PlayerId, money::Money};

/// Compute a near-minimal set of transfers that zeroes every balance.
///
/// Greedy max-pair matching: repeatedly match the largest debtor with the
/// largest creditor and transfer `min(debt, credit)` between them. Finding
/// the true minimum transfer count is NP-hard in general; this heuristic
/// settles `n` non-zero parties in at most `n - 1` transfers and never
/// produces a transfer that overshoots either side.
///
/// Ties in magnitude break toward the smaller player id, so the plan is
/// deterministic: the same balances always yield the same suggestions.
///
/// Zero balances are ignored and an empty mapping yields an empty plan.
///
/// # Errors
///
/// * `SettlementError::UnbalancedInput` - Balances do not sum to zero
pub fn plan_settlement(
    balances: &BTreeMap<PlayerId, Money>,
) -> SettlementResult<Vec<SettlementSuggestion>> {
    let residual: Money = balances.values().copied().sum();
    if !residual.is_zero() {
        return Err(SettlementError::UnbalancedInput { residual });
    }

    // Max-heaps keyed by magnitude; Reverse(id) makes equal magnitudes
    // pop in ascending id order.
    let mut debtors: BinaryHeap<(Money, Reverse<PlayerId>)> = BinaryHeap::new();
    let mut creditors: BinaryHeap<(Money, Reverse<PlayerId>)> = BinaryHeap::new();
    for (&player_id, &balance) in balances {
        if balance.is_negative() {
            debtors.push((balance.abs(), Reverse(player_id)));
        } else if balance.is_positive() {
            creditors.push((balance, Reverse(player_id)));
        }
    }

    let mut suggestions = Vec::new();
    while let (Some((debt, Reverse(debtor))), Some((credit, Reverse(creditor)))) =
        (debtors.pop(), creditors.pop())
    {
        let amount = debt.min(credit);
        suggestions.push(SettlementSuggestion {
            from: debtor,
            to: creditor,
            amount,
        });

        let remaining_debt = debt - amount;
        if remaining_debt.is_positive() {
            debtors.push((remaining_debt, Reverse(debtor)));
        }
        let remaining_credit = credit - amount;
        if remaining_credit.is_positive() {
            creditors.push((remaining_credit, Reverse(creditor)));
        }
    }

    Ok(suggestions)
}
