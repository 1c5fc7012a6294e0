//! Game ledger module: per-game buy-in/cash-out bookkeeping.
//!
//! This module implements:
//! - Buy-in and cash-out recording with open/completed lifecycle rules
//! - The zero-sum close check (the pot is a closed loop)
//! - Per-player profit queries
//! - A repository-backed manager for the persistence boundary
//!
//! ## Example
//!
//! ```
//! use pokernight::game::{Game, GameLedger, GameState};
//! use pokernight::money::Money;
//! use chrono::Utc;
//!
//! let game = Game {
//!     id: 1,
//!     group_id: 1,
//!     stakes: "1/2 NL".to_string(),
//!     default_buy_in: Money::from_minor(2500),
//!     bank_player_id: 1,
//!     state: GameState::Open,
//!     started_at: Utc::now(),
//!     ended_at: None,
//! };
//!
//! let mut ledger = GameLedger::new(game, vec![]);
//! ledger.record_buy_in(1, Money::from_minor(2500))?;
//! ledger.record_buy_in(2, Money::from_minor(2500))?;
//! ledger.record_cash_out(1, Money::from_minor(1000))?;
//! ledger.record_cash_out(2, Money::from_minor(4000))?;
//! ledger.close_game()?;
//!
//! assert_eq!(ledger.profit_of(2)?, Money::from_minor(1500));
//! # Ok::<(), pokernight::game::LedgerError>(())
//! ```

pub mod errors;
pub mod ledger;
pub mod manager;
pub mod models;

pub use errors::{LedgerError, LedgerResult};
pub use ledger::GameLedger;
pub use manager::GameManager;
pub use models::{Game, GameId, GamePlayerEntry, GameState, GroupId, Player, PlayerId};
