//! Payment manager orchestrating payment recording against the repositories.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use log::info;

use super::{
    errors::{PaymentError, PaymentResult},
    models::Payment,
    tracker::PaymentTracker,
};
use crate::{
    db::{GameRepository, PaymentRepository},
    game::{GameId, GamePlayerEntry, PlayerId},
    money::Money,
};

/// Payment configuration
#[derive(Debug, Clone, Copy)]
pub struct PaymentConfig {
    /// How far a payer's outgoing total may exceed what they owe before
    /// the payment is rejected as an overpayment, in minor units
    pub overpayment_tolerance: Money,
}

impl PaymentConfig {
    /// Read configuration from the environment.
    ///
    /// `OVERPAYMENT_TOLERANCE` overrides the tolerance (minor units,
    /// default 0).
    pub fn from_env() -> Self {
        let overpayment_tolerance = std::env::var("OVERPAYMENT_TOLERANCE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(0);

        Self {
            overpayment_tolerance: Money::from_minor(overpayment_tolerance),
        }
    }
}

impl Default for PaymentConfig {
    fn default() -> Self {
        Self {
            overpayment_tolerance: Money::ZERO,
        }
    }
}

/// Payment manager
#[derive(Clone)]
pub struct PaymentManager {
    game_repo: Arc<dyn GameRepository>,
    payment_repo: Arc<dyn PaymentRepository>,
    config: PaymentConfig,
}

impl PaymentManager {
    /// Create a new payment manager backed by the given repositories.
    pub fn new(
        game_repo: Arc<dyn GameRepository>,
        payment_repo: Arc<dyn PaymentRepository>,
        config: PaymentConfig,
    ) -> Self {
        Self {
            game_repo,
            payment_repo,
            config,
        }
    }

    async fn load_tracker(&self, game_id: GameId) -> PaymentResult<PaymentTracker> {
        let game = self.game_repo.load_game(game_id).await?;
        if game.is_open() {
            return Err(PaymentError::GameNotCompleted(game_id));
        }

        let entries = self.game_repo.load_player_entries(game_id).await?;
        let payments = self.payment_repo.load_payments(game_id).await?;
        let profits = entries
            .iter()
            .map(|entry: &GamePlayerEntry| (entry.player_id, entry.profit()));
        Ok(PaymentTracker::new(
            profits,
            &payments,
            self.config.overpayment_tolerance,
        ))
    }

    /// Record a real-world payment between two players for a completed game.
    ///
    /// The idempotency key deduplicates retries: resubmitting with a key
    /// that was already booked fails with `DuplicatePayment` instead of
    /// recording the transfer twice.
    ///
    /// # Errors
    ///
    /// * `PaymentError::DuplicatePayment` - Idempotency key already used
    /// * `PaymentError::GameNotCompleted` - Game is still open
    /// * `PaymentError::Overpayment` - Would overshoot what the payer owes
    pub async fn record_payment(
        &self,
        game_id: GameId,
        payer_id: PlayerId,
        payee_id: PlayerId,
        amount: Money,
        idempotency_key: String,
    ) -> PaymentResult<Payment> {
        if self
            .payment_repo
            .find_by_idempotency_key(&idempotency_key)
            .await?
            .is_some()
        {
            return Err(PaymentError::DuplicatePayment(idempotency_key));
        }

        let mut tracker = self.load_tracker(game_id).await?;
        tracker.record_payment(payer_id, payee_id, amount)?;

        let payment = Payment {
            id: 0,
            game_id,
            payer_id,
            payee_id,
            amount,
            idempotency_key,
            paid_at: Utc::now(),
        };
        let id = self.payment_repo.save_payment(&payment).await?;
        info!("Recorded {amount} payment from player {payer_id} to {payee_id} for game {game_id}");

        Ok(Payment { id, ..payment })
    }

    /// Remaining signed balance per player for a completed game.
    pub async fn outstanding_balances(
        &self,
        game_id: GameId,
    ) -> PaymentResult<BTreeMap<PlayerId, Money>> {
        let tracker = self.load_tracker(game_id).await?;
        Ok(tracker.outstanding_balances())
    }

    /// True once every payment for the game has been made.
    ///
    /// Settlement is about cash having moved; it is separate from game
    /// completion, which is about chip counting being done.
    pub async fn is_fully_settled(&self, game_id: GameId) -> PaymentResult<bool> {
        let tracker = self.load_tracker(game_id).await?;
        Ok(tracker.is_fully_settled())
    }
}
