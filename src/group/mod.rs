//! Group ledger module: rolling per-game results into running totals.
//!
//! This module implements:
//! - Pure recompute-on-read aggregation into per-player snapshots
//! - Cross-game netting of outstanding balances for group-wide settlement
//! - The member-removal guard (nobody leaves holding open money)

pub mod aggregator;
pub mod errors;
pub mod manager;
pub mod models;

pub use aggregator::{CompletedGame, aggregate, group_outstanding_balances, plan_group_settlement};
pub use errors::{GroupError, GroupResult};
pub use manager::GroupManager;
pub use models::GroupLedgerSnapshot;
