//! Outstanding-balance tracking for a completed game.

use std::collections::BTreeMap;

use super::{
    errors::{PaymentError, PaymentResult},
    models::Payment,
};
use crate::{game::PlayerId, money::Money};

/// Tracks which portion of each player's result has actually changed hands.
///
/// Built from a completed game's per-player profits plus the payments
/// recorded so far; nothing here is stored independently, so balances can
/// never drift from the underlying records.
///
/// Sign convention for balances: negative = still owes, positive = still
/// owed, zero = settled.
#[derive(Debug, Clone)]
pub struct PaymentTracker {
    profits: BTreeMap<PlayerId, Money>,
    paid_out: BTreeMap<PlayerId, Money>,
    received: BTreeMap<PlayerId, Money>,
    tolerance: Money,
}

impl PaymentTracker {
    /// Build a tracker from per-player profits and recorded payments.
    ///
    /// `tolerance` is the overpayment slack in minor units: how far a
    /// payer's cumulative outgoing may exceed what they owe before the
    /// payment is rejected. Zero means strict.
    pub fn new(
        profits: impl IntoIterator<Item = (PlayerId, Money)>,
        payments: &[Payment],
        tolerance: Money,
    ) -> Self {
        let mut tracker = Self {
            profits: profits.into_iter().collect(),
            paid_out: BTreeMap::new(),
            received: BTreeMap::new(),
            tolerance,
        };
        for payment in payments {
            *tracker.paid_out.entry(payment.payer_id).or_default() += payment.amount;
            *tracker.received.entry(payment.payee_id).or_default() += payment.amount;
        }
        tracker
    }

    /// Validate and apply a payment from `payer_id` to `payee_id`.
    ///
    /// Cross-pair payments are fine (a debtor may settle with any
    /// creditor, not just the bank player, when a multi-hop plan is in
    /// use). The one hard rule: the payer's outgoing total may not push
    /// their owed balance past zero beyond the tolerance.
    ///
    /// # Errors
    ///
    /// * `PaymentError::InvalidAmount` - Amount is not positive
    /// * `PaymentError::SelfPayment` - Payer and payee are the same
    /// * `PaymentError::Overpayment` - Would overshoot what the payer owes;
    ///   balances are left unchanged
    pub fn record_payment(
        &mut self,
        payer_id: PlayerId,
        payee_id: PlayerId,
        amount: Money,
    ) -> PaymentResult<()> {
        if !amount.is_positive() {
            return Err(PaymentError::InvalidAmount(amount));
        }
        if payer_id == payee_id {
            return Err(PaymentError::SelfPayment(payer_id));
        }

        let outstanding = self.balance_of(payer_id);
        if outstanding + amount > self.tolerance {
            return Err(PaymentError::Overpayment {
                player_id: payer_id,
                attempted: amount,
                outstanding,
            });
        }

        *self.paid_out.entry(payer_id).or_default() += amount;
        *self.received.entry(payee_id).or_default() += amount;
        Ok(())
    }

    fn balance_of(&self, player_id: PlayerId) -> Money {
        let profit = self.profits.get(&player_id).copied().unwrap_or(Money::ZERO);
        let out = self
            .paid_out
            .get(&player_id)
            .copied()
            .unwrap_or(Money::ZERO);
        let received = self
            .received
            .get(&player_id)
            .copied()
            .unwrap_or(Money::ZERO);
        profit + out - received
    }

    /// Remaining signed balance for one player.
    ///
    /// # Errors
    ///
    /// * `PaymentError::PlayerNotInGame` - Player has no entry in the game
    pub fn outstanding_of(&self, player_id: PlayerId) -> PaymentResult<Money> {
        if !self.profits.contains_key(&player_id) {
            return Err(PaymentError::PlayerNotInGame(player_id));
        }
        Ok(self.balance_of(player_id))
    }

    /// Remaining signed balance per player, in ascending player-id order.
    pub fn outstanding_balances(&self) -> BTreeMap<PlayerId, Money> {
        self.profits
            .keys()
            .map(|&player_id| (player_id, self.balance_of(player_id)))
            .collect()
    }

    /// True once every player's outstanding balance is exactly zero.
    pub fn is_fully_settled(&self) -> bool {
        self.profits
            .keys()
            .all(|&player_id| self.balance_of(player_id).is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cents(units: i64) -> Money {
        Money::from_minor(units)
    }

    fn tracker(profits: &[(PlayerId, i64)], tolerance: i64) -> PaymentTracker {
        PaymentTracker::new(
            profits.iter().map(|&(p, m)| (p, cents(m))),
            &[],
            cents(tolerance),
        )
    }

    #[test]
    fn test_balances_start_at_profit() {
        let t = tracker(&[(1, -500), (2, -300), (3, 800)], 0);
        assert_eq!(t.outstanding_of(1).unwrap(), cents(-500));
        assert_eq!(t.outstanding_of(3).unwrap(), cents(800));
        assert!(!t.is_fully_settled());
    }

    #[test]
    fn test_partial_then_full_settlement() {
        let mut t = tracker(&[(1, -500), (2, 500)], 0);
        t.record_payment(1, 2, cents(200)).unwrap();
        assert_eq!(t.outstanding_of(1).unwrap(), cents(-300));
        assert_eq!(t.outstanding_of(2).unwrap(), cents(300));
        assert!(!t.is_fully_settled());

        t.record_payment(1, 2, cents(300)).unwrap();
        assert!(t.is_fully_settled());
        assert!(t.outstanding_balances().values().all(|b| b.is_zero()));
    }

    #[test]
    fn test_cross_pair_payment_is_allowed() {
        // 1 owes, 2 and 3 are owed; 1 may settle with either
        let mut t = tracker(&[(1, -500), (2, 300), (3, 200)], 0);
        t.record_payment(1, 3, cents(200)).unwrap();
        t.record_payment(1, 2, cents(300)).unwrap();
        assert!(t.is_fully_settled());
    }

    #[test]
    fn test_overpayment_rejected_and_state_unchanged() {
        let mut t = tracker(&[(1, -500), (2, 500)], 0);
        let err = t.record_payment(1, 2, cents(501)).unwrap_err();
        match err {
            PaymentError::Overpayment {
                player_id,
                attempted,
                outstanding,
            } => {
                assert_eq!(player_id, 1);
                assert_eq!(attempted, cents(501));
                assert_eq!(outstanding, cents(-500));
            }
            other => panic!("expected Overpayment, got {other:?}"),
        }
        // Rejection left the balances untouched
        assert_eq!(t.outstanding_of(1).unwrap(), cents(-500));
        assert_eq!(t.outstanding_of(2).unwrap(), cents(500));
    }

    #[test]
    fn test_tolerance_allows_small_overshoot() {
        let mut t = tracker(&[(1, -500), (2, 500)], 5);
        t.record_payment(1, 2, cents(503)).unwrap();
        assert_eq!(t.outstanding_of(1).unwrap(), cents(3));
    }

    #[test]
    fn test_payment_from_creditor_is_an_overpayment() {
        let mut t = tracker(&[(1, -500), (2, 500)], 0);
        assert!(matches!(
            t.record_payment(2, 1, cents(100)),
            Err(PaymentError::Overpayment { .. })
        ));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let mut t = tracker(&[(1, -500), (2, 500)], 0);
        assert!(matches!(
            t.record_payment(1, 2, cents(0)),
            Err(PaymentError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_self_payment_rejected() {
        let mut t = tracker(&[(1, -500), (2, 500)], 0);
        assert!(matches!(
            t.record_payment(1, 1, cents(100)),
            Err(PaymentError::SelfPayment(1))
        ));
    }

    #[test]
    fn test_unknown_player_balance_query_fails() {
        let t = tracker(&[(1, -500), (2, 500)], 0);
        assert!(matches!(
            t.outstanding_of(99),
            Err(PaymentError::PlayerNotInGame(99))
        ));
    }
}
