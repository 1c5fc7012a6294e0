//! Settlement module: who pays whom to clear a set of balances.
//!
//! This module implements:
//! - Greedy max-pair debt netting over an abstract balance mapping
//! - Deterministic tie-breaking so reloading never changes the plan
//! - Independent zero-sum validation of planner input
//!
//! The planner works on any player-to-balance mapping, so it serves both
//! single-game settlement and group-wide cross-game netting.

pub mod errors;
pub mod models;
pub mod planner;

pub use errors::{SettlementError, SettlementResult};
pub use models::SettlementSuggestion;
pub use planner::plan_settlement;
