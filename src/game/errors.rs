//! Ledger error types.

use thiserror::Error;

use super::models::{GameId, PlayerId};
use crate::money::Money;

/// Ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Game not found
    #[error("Game not found: {0}")]
    GameNotFound(GameId),

    /// Invalid amount (buy-ins must be positive, cash-outs non-negative)
    #[error("Invalid amount: {0}")]
    InvalidAmount(Money),

    /// Mutation attempted on a completed game
    #[error("Game {0} is not open")]
    GameNotOpen(GameId),

    /// Query for a player with no entry in the game
    #[error("Player {0} is not in this game")]
    PlayerNotInGame(PlayerId),

    /// Close attempted while players still have chips on the table
    #[error("Missing cash-outs for {} player(s)", .0.len())]
    MissingCashOut(Vec<PlayerId>),

    /// The zero-sum invariant failed at close time: cash-outs do not add
    /// up to buy-ins. Carries the residual and per-player profits so the
    /// caller can show where the count went wrong.
    #[error("Ledger out of balance by {residual}")]
    LedgerImbalance {
        residual: Money,
        profits: Vec<(PlayerId, Money)>,
    },
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
