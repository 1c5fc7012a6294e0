//! Group ledger error types.

use thiserror::Error;

use crate::{
    game::{LedgerError, PlayerId},
    money::Money,
    payment::PaymentError,
    settlement::SettlementError,
};

/// Group ledger errors
#[derive(Debug, Error)]
pub enum GroupError {
    /// Underlying ledger error (game/entry access)
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Underlying payment error
    #[error(transparent)]
    Payment(#[from] PaymentError),

    /// Underlying settlement error
    #[error(transparent)]
    Settlement(#[from] SettlementError),

    /// Member removal is blocked while the player still has money on the
    /// table or unsettled debts; removing them would orphan the balance.
    #[error("Player {player_id} still has {amount} outstanding in this group")]
    OutstandingBalance { player_id: PlayerId, amount: Money },
}

/// Result type for group ledger operations
pub type GroupResult<T> = Result<T, GroupError>;
