//! Payment error types.

use thiserror::Error;

use crate::{
    game::{GameId, LedgerError, PlayerId},
    money::Money,
};

/// Payment errors
#[derive(Debug, Error)]
pub enum PaymentError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Underlying ledger error (game lookup, entries)
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Invalid amount (payments must be positive)
    #[error("Invalid amount: {0}")]
    InvalidAmount(Money),

    /// Payer and payee are the same player
    #[error("Player {0} cannot pay themselves")]
    SelfPayment(PlayerId),

    /// Payments can only be recorded against a completed game
    #[error("Game {0} is not completed yet")]
    GameNotCompleted(GameId),

    /// Balance query for a player with no entry in the game
    #[error("Player {0} is not in this game")]
    PlayerNotInGame(PlayerId),

    /// The payment would drive the payer's owed balance past zero beyond
    /// the configured tolerance. Rejected rather than clamped: silently
    /// clamping would hide a data-entry error.
    #[error("Overpayment by player {player_id}: paying {attempted} against {outstanding} outstanding")]
    Overpayment {
        player_id: PlayerId,
        attempted: Money,
        outstanding: Money,
    },

    /// Duplicate payment (idempotency key already used)
    #[error("Duplicate payment: {0}")]
    DuplicatePayment(String),
}

/// Result type for payment operations
pub type PaymentResult<T> = Result<T, PaymentError>;
