//! Settlement planner error types.

use thiserror::Error;

use crate::money::Money;

/// Settlement errors
#[derive(Debug, Error)]
pub enum SettlementError {
    /// The balance mapping does not sum to zero, so no set of transfers
    /// can clear it. Should be unreachable when balances come from a
    /// closed ledger, but the planner checks independently since it may
    /// be fed aggregated balances from several games.
    #[error("Balances do not sum to zero (residual {residual})")]
    UnbalancedInput { residual: Money },
}

/// Result type for settlement operations
pub type SettlementResult<T> = Result<T, SettlementError>;
