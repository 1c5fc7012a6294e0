//! Payment module tracking real-world settlements of game results.
//!
//! This module implements:
//! - Append-only payment records between players
//! - Outstanding-balance computation derived from profits and payments
//! - Overpayment rejection with a configurable tolerance
//! - Idempotency keys to prevent duplicate submissions
//! - Full-settlement detection per game

pub mod errors;
pub mod manager;
pub mod models;
pub mod tracker;

pub use errors::{PaymentError, PaymentResult};
pub use manager::{PaymentConfig, PaymentManager};
pub use models::{Payment, PaymentId};
pub use tracker::PaymentTracker;
