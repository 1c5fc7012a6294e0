//! Group ledger data models.

use serde::{Deserialize, Serialize};

use crate::{game::PlayerId, money::Money};

/// Per-player aggregate over a group's history.
///
/// Always recomputed from game entries and payments; there is no write
/// path, so a snapshot can never drift from the source records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupLedgerSnapshot {
    pub player_id: PlayerId,
    /// Sum of profits across all completed games
    pub lifetime_profit: Money,
    /// Number of completed games the player appears in
    pub games_played: u32,
    /// Best single-game profit; zero if the player has never won
    pub biggest_win: Money,
    /// Worst single-game profit (signed, so at most zero)
    pub biggest_loss: Money,
    /// Net signed balance across games not yet fully settled
    /// (negative = owes, positive = owed)
    pub outstanding: Money,
}

impl GroupLedgerSnapshot {
    pub fn new(player_id: PlayerId) -> Self {
        Self {
            player_id,
            lifetime_profit: Money::ZERO,
            games_played: 0,
            biggest_win: Money::ZERO,
            biggest_loss: Money::ZERO,
            outstanding: Money::ZERO,
        }
    }
}
