//! # Pokernight
//!
//! A ledger and settlement engine for recurring home poker games: who
//! played, how much each buy-in and cash-out was, who owes whom, and when
//! a game is actually paid off.
//!
//! The core is a pure computation layer over externally persisted records.
//! It holds no caches and spawns no background work; persistence happens
//! behind repository traits so the whole engine runs against an in-memory
//! store in tests.
//!
//! ## Architecture
//!
//! Money flows through four stages:
//!
//! - **Recording**: buy-ins and cash-outs accumulate in a [`game::GameLedger`]
//!   while the game is open.
//! - **Closing**: [`game::GameLedger::close_game`] verifies the pot is a
//!   closed loop (profits must sum to exactly zero) before the game is
//!   marked completed.
//! - **Settling**: [`settlement::plan_settlement`] proposes a near-minimal
//!   set of transfers; [`payment::PaymentTracker`] tracks the cash that
//!   actually moves until every balance reaches zero.
//! - **Reporting**: [`group::aggregate`] folds completed games into
//!   per-player lifetime totals and nets outstanding balances across games.
//!
//! ## Core Modules
//!
//! - [`money`]: Fixed-point monetary values (integer minor units)
//! - [`game`]: Per-game bookkeeping and the zero-sum close check
//! - [`payment`]: Real-world payment tracking and settlement detection
//! - [`settlement`]: Debt netting over abstract balance mappings
//! - [`group`]: Group-level aggregation and cross-game netting
//! - [`db`]: Repository contracts plus Postgres and in-memory backends
//!
//! ## Example
//!
//! ```
//! use pokernight::money::Money;
//! use pokernight::settlement::plan_settlement;
//! use std::collections::BTreeMap;
//!
//! let balances = BTreeMap::from([
//!     (1, Money::from_minor(-500)),
//!     (2, Money::from_minor(-300)),
//!     (3, Money::from_minor(800)),
//! ]);
//!
//! let plan = plan_settlement(&balances)?;
//! assert_eq!(plan.len(), 2);
//! # Ok::<(), pokernight::settlement::SettlementError>(())
//! ```

/// Fixed-point monetary values.
pub mod money;
pub use money::Money;

/// Per-game buy-in/cash-out bookkeeping.
pub mod game;
pub use game::{Game, GameLedger, GameManager, GamePlayerEntry, LedgerError};

/// Real-world payment tracking.
pub mod payment;
pub use payment::{Payment, PaymentConfig, PaymentError, PaymentManager, PaymentTracker};

/// Debt netting and transfer suggestions.
pub mod settlement;
pub use settlement::{SettlementError, SettlementSuggestion, plan_settlement};

/// Group-level aggregation.
pub mod group;
pub use group::{GroupError, GroupLedgerSnapshot, GroupManager, aggregate};

/// Persistence contracts and backends.
pub mod db;
pub use db::{Database, DatabaseConfig, GameRepository, InMemoryRepository, PaymentRepository};
