//! Settlement data models.

use serde::{Deserialize, Serialize};

use crate::{game::PlayerId, money::Money};

/// A suggested transfer: `from` pays `to` the given amount.
///
/// Purely advisory. The authoritative settlement state is always derived
/// from recorded payments, never from a suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementSuggestion {
    pub from: PlayerId,
    pub to: PlayerId,
    pub amount: Money,
}
