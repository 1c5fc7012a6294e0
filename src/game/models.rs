//! Game and player ledger data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Game ID type
pub type GameId = i64;

/// Player ID type
pub type PlayerId = i64;

/// Group ID type
pub type GroupId = i64;

/// A member of a poker group.
///
/// Immutable once referenced by a ledger entry; the id is the only part
/// the engine cares about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: String,
}

/// Game lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameState {
    /// Chips in play; buy-ins and cash-outs may still be recorded
    Open,
    /// Chip counting done; player entries are immutable (terminal)
    Completed,
}

impl std::fmt::Display for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GameState::Open => write!(f, "open"),
            GameState::Completed => write!(f, "completed"),
        }
    }
}

/// A single poker session belonging to a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub group_id: GroupId,
    /// Stakes label shown to players, e.g. "5/10 NL"
    pub stakes: String,
    /// Default buy-in amount for the session
    pub default_buy_in: Money,
    /// The player physically holding the cash for this game
    pub bank_player_id: PlayerId,
    pub state: GameState,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl Game {
    pub fn is_open(&self) -> bool {
        self.state == GameState::Open
    }
}

/// Per-(game, player) buy-in and cash-out figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamePlayerEntry {
    pub game_id: GameId,
    pub player_id: PlayerId,
    /// Sum of all buy-in events; always positive once the player joined
    pub buy_in: Money,
    /// Set once at game end; `None` while the game is open
    pub cash_out: Option<Money>,
}

impl GamePlayerEntry {
    pub fn new(game_id: GameId, player_id: PlayerId) -> Self {
        Self {
            game_id,
            player_id,
            buy_in: Money::ZERO,
            cash_out: None,
        }
    }

    /// Signed net result: cash-out minus buy-in.
    ///
    /// While the game is open and no cash-out has been recorded yet, this
    /// is the player's current exposure (their buy-in, negated).
    pub fn profit(&self) -> Money {
        self.cash_out.unwrap_or(Money::ZERO) - self.buy_in
    }

    pub fn has_cashed_out(&self) -> bool {
        self.cash_out.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profit_is_cash_out_minus_buy_in() {
        let mut entry = GamePlayerEntry::new(1, 7);
        entry.buy_in = Money::from_minor(5000);
        entry.cash_out = Some(Money::from_minor(7250));
        assert_eq!(entry.profit(), Money::from_minor(2250));
    }

    #[test]
    fn test_profit_before_cash_out_is_exposure() {
        let mut entry = GamePlayerEntry::new(1, 7);
        entry.buy_in = Money::from_minor(5000);
        assert!(!entry.has_cashed_out());
        assert_eq!(entry.profit(), Money::from_minor(-5000));
    }

    #[test]
    fn test_game_state_display() {
        assert_eq!(GameState::Open.to_string(), "open");
        assert_eq!(GameState::Completed.to_string(), "completed");
    }
}
