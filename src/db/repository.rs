//! Repository contracts over the persisted ledger records.
//!
//! The engine core is a pure computation layer; everything it reads or
//! writes goes through these traits so the persistence collaborator can be
//! swapped: Postgres in production, [`super::memory::InMemoryRepository`]
//! in tests. Serializing concurrent mutations of the same game (so the
//! close-time zero-sum check sees a consistent snapshot) is the
//! implementation's responsibility, not the core's.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::game::{Game, GameId, GamePlayerEntry, GameState, GroupId, LedgerError, LedgerResult};
use crate::money::Money;
use crate::payment::{Payment, PaymentId, PaymentResult};

/// Trait for game and player-entry persistence
#[async_trait]
pub trait GameRepository: Send + Sync {
    /// Load a game by id
    async fn load_game(&self, game_id: GameId) -> LedgerResult<Game>;

    /// Load all player entries for a game
    async fn load_player_entries(&self, game_id: GameId) -> LedgerResult<Vec<GamePlayerEntry>>;

    /// Persist a game's current state (atomic per call)
    async fn save_game(&self, game: &Game) -> LedgerResult<()>;

    /// Persist one player entry (atomic per call)
    async fn save_player_entry(&self, entry: &GamePlayerEntry) -> LedgerResult<()>;

    /// All completed games for a group
    async fn load_completed_games(&self, group_id: GroupId) -> LedgerResult<Vec<Game>>;

    /// All still-open games for a group
    async fn load_open_games(&self, group_id: GroupId) -> LedgerResult<Vec<Game>>;
}

/// Trait for append-only payment log access
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// All payments recorded for a game
    async fn load_payments(&self, game_id: GameId) -> PaymentResult<Vec<Payment>>;

    /// Append a payment, returning its assigned id
    async fn save_payment(&self, payment: &Payment) -> PaymentResult<PaymentId>;

    /// Look up a payment by idempotency key
    async fn find_by_idempotency_key(&self, key: &str) -> PaymentResult<Option<Payment>>;
}

fn game_from_row(row: &sqlx::postgres::PgRow) -> Game {
    Game {
        id: row.get("id"),
        group_id: row.get("group_id"),
        stakes: row.get("stakes"),
        default_buy_in: Money::from_minor(row.get("default_buy_in")),
        bank_player_id: row.get("bank_player_id"),
        state: match row.get::<String, _>("state").as_str() {
            "completed" => GameState::Completed,
            _ => GameState::Open,
        },
        started_at: row.get::<chrono::NaiveDateTime, _>("started_at").and_utc(),
        ended_at: row
            .get::<Option<chrono::NaiveDateTime>, _>("ended_at")
            .map(|t| t.and_utc()),
    }
}

/// PostgreSQL implementation of `GameRepository`
pub struct PgGameRepository {
    pool: PgPool,
}

impl PgGameRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GameRepository for PgGameRepository {
    async fn load_game(&self, game_id: GameId) -> LedgerResult<Game> {
        let row = sqlx::query(
            r#"
            SELECT id, group_id, stakes, default_buy_in, bank_player_id, state, started_at, ended_at
            FROM games
            WHERE id = $1
            "#,
        )
        .bind(game_id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(LedgerError::GameNotFound(game_id))?;

        Ok(game_from_row(&row))
    }

    async fn load_player_entries(&self, game_id: GameId) -> LedgerResult<Vec<GamePlayerEntry>> {
        let rows = sqlx::query(
            r#"
            SELECT game_id, player_id, buy_in, cash_out
            FROM game_players
            WHERE game_id = $1
            ORDER BY player_id
            "#,
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| GamePlayerEntry {
                game_id: row.get("game_id"),
                player_id: row.get("player_id"),
                buy_in: Money::from_minor(row.get("buy_in")),
                cash_out: row.get::<Option<i64>, _>("cash_out").map(Money::from_minor),
            })
            .collect())
    }

    async fn save_game(&self, game: &Game) -> LedgerResult<()> {
        sqlx::query(
            r#"
            UPDATE games
            SET state = $1, ended_at = $2
            WHERE id = $3
            "#,
        )
        .bind(game.state.to_string())
        .bind(game.ended_at.map(|t| t.naive_utc()))
        .bind(game.id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn save_player_entry(&self, entry: &GamePlayerEntry) -> LedgerResult<()> {
        sqlx::query(
            r#"
            INSERT INTO game_players (game_id, player_id, buy_in, cash_out)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (game_id, player_id)
            DO UPDATE SET buy_in = EXCLUDED.buy_in, cash_out = EXCLUDED.cash_out
            "#,
        )
        .bind(entry.game_id)
        .bind(entry.player_id)
        .bind(entry.buy_in.minor_units())
        .bind(entry.cash_out.map(Money::minor_units))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn load_completed_games(&self, group_id: GroupId) -> LedgerResult<Vec<Game>> {
        let rows = sqlx::query(
            r#"
            SELECT id, group_id, stakes, default_buy_in, bank_player_id, state, started_at, ended_at
            FROM games
            WHERE group_id = $1 AND state = 'completed'
            ORDER BY started_at
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(game_from_row).collect())
    }

    async fn load_open_games(&self, group_id: GroupId) -> LedgerResult<Vec<Game>> {
        let rows = sqlx::query(
            r#"
            SELECT id, group_id, stakes, default_buy_in, bank_player_id, state, started_at, ended_at
            FROM games
            WHERE group_id = $1 AND state = 'open'
            ORDER BY started_at
            "#,
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(game_from_row).collect())
    }
}

fn payment_from_row(row: &sqlx::postgres::PgRow) -> Payment {
    Payment {
        id: row.get("id"),
        game_id: row.get("game_id"),
        payer_id: row.get("payer_id"),
        payee_id: row.get("payee_id"),
        amount: Money::from_minor(row.get("amount")),
        idempotency_key: row.get("idempotency_key"),
        paid_at: row.get::<chrono::NaiveDateTime, _>("paid_at").and_utc(),
    }
}

/// PostgreSQL implementation of `PaymentRepository`
pub struct PgPaymentRepository {
    pool: PgPool,
}

impl PgPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PaymentRepository for PgPaymentRepository {
    async fn load_payments(&self, game_id: GameId) -> PaymentResult<Vec<Payment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, game_id, payer_id, payee_id, amount, idempotency_key, paid_at
            FROM payments
            WHERE game_id = $1
            ORDER BY paid_at, id
            "#,
        )
        .bind(game_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(payment_from_row).collect())
    }

    async fn save_payment(&self, payment: &Payment) -> PaymentResult<PaymentId> {
        let row = sqlx::query(
            r#"
            INSERT INTO payments (game_id, payer_id, payee_id, amount, idempotency_key, paid_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(payment.game_id)
        .bind(payment.payer_id)
        .bind(payment.payee_id)
        .bind(payment.amount.minor_units())
        .bind(&payment.idempotency_key)
        .bind(payment.paid_at.naive_utc())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get("id"))
    }

    async fn find_by_idempotency_key(&self, key: &str) -> PaymentResult<Option<Payment>> {
        let row = sqlx::query(
            r#"
            SELECT id, game_id, payer_id, payee_id, amount, idempotency_key, paid_at
            FROM payments
            WHERE idempotency_key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(payment_from_row))
    }
}
