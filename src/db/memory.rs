//! In-memory repository for tests and examples.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::repository::{GameRepository, PaymentRepository};
use crate::game::{
    Game, GameId, GamePlayerEntry, GameState, GroupId, LedgerError, LedgerResult, PlayerId,
};
use crate::payment::{Payment, PaymentId, PaymentResult};

#[derive(Default)]
struct Inner {
    games: BTreeMap<GameId, Game>,
    entries: BTreeMap<GameId, BTreeMap<PlayerId, GamePlayerEntry>>,
    payments: Vec<Payment>,
    next_payment_id: PaymentId,
}

/// In-memory implementation of both repository traits.
///
/// Backs the engine with plain maps so the full ledger flow can run in a
/// test without a database. Mutations take a single lock, which also
/// gives each operation the per-call atomicity the contracts require.
#[derive(Default)]
pub struct InMemoryRepository {
    inner: Mutex<Inner>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a game, as the surrounding product would on game creation.
    pub async fn insert_game(&self, game: Game) {
        let mut inner = self.inner.lock().await;
        inner.games.insert(game.id, game);
    }
}

#[async_trait]
impl GameRepository for InMemoryRepository {
    async fn load_game(&self, game_id: GameId) -> LedgerResult<Game> {
        let inner = self.inner.lock().await;
        inner
            .games
            .get(&game_id)
            .cloned()
            .ok_or(LedgerError::GameNotFound(game_id))
    }

    async fn load_player_entries(&self, game_id: GameId) -> LedgerResult<Vec<GamePlayerEntry>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .entries
            .get(&game_id)
            .map(|entries| entries.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn save_game(&self, game: &Game) -> LedgerResult<()> {
        let mut inner = self.inner.lock().await;
        inner.games.insert(game.id, game.clone());
        Ok(())
    }

    async fn save_player_entry(&self, entry: &GamePlayerEntry) -> LedgerResult<()> {
        let mut inner = self.inner.lock().await;
        inner
            .entries
            .entry(entry.game_id)
            .or_default()
            .insert(entry.player_id, entry.clone());
        Ok(())
    }

    async fn load_completed_games(&self, group_id: GroupId) -> LedgerResult<Vec<Game>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .games
            .values()
            .filter(|g| g.group_id == group_id && g.state == GameState::Completed)
            .cloned()
            .collect())
    }

    async fn load_open_games(&self, group_id: GroupId) -> LedgerResult<Vec<Game>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .games
            .values()
            .filter(|g| g.group_id == group_id && g.state == GameState::Open)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PaymentRepository for InMemoryRepository {
    async fn load_payments(&self, game_id: GameId) -> PaymentResult<Vec<Payment>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .payments
            .iter()
            .filter(|p| p.game_id == game_id)
            .cloned()
            .collect())
    }

    async fn save_payment(&self, payment: &Payment) -> PaymentResult<PaymentId> {
        let mut inner = self.inner.lock().await;
        inner.next_payment_id += 1;
        let id = inner.next_payment_id;
        inner.payments.push(Payment {
            id,
            ..payment.clone()
        });
        Ok(id)
    }

    async fn find_by_idempotency_key(&self, key: &str) -> PaymentResult<Option<Payment>> {
        let inner = self.inner.lock().await;
        Ok(inner
            .payments
            .iter()
            .find(|p| p.idempotency_key == key)
            .cloned())
    }
}
