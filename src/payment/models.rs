//! Payment data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    game::{GameId, PlayerId},
    money::Money,
};

/// Payment ID type
pub type PaymentId = i64;

/// A recorded real-world transfer between two players for one game.
///
/// Payments are append-only: a payment is never mutated, only offset by a
/// later payment in the other direction. Several partial payments may
/// exist between the same pair for the same game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub game_id: GameId,
    pub payer_id: PlayerId,
    pub payee_id: PlayerId,
    pub amount: Money,
    /// Caller-supplied key so a retried submission is not booked twice
    pub idempotency_key: String,
    pub paid_at: DateTime<Utc>,
}

impl Payment {
    /// Generate a fresh idempotency key for a new submission.
    ///
    /// Callers that retry must reuse the key from the first attempt; this
    /// helper is for the initial one.
    pub fn new_idempotency_key() -> String {
        Uuid::new_v4().to_string()
    }
}
