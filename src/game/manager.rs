//! Game manager orchestrating ledger mutations against the repository.
//!
//! The manager owns no game state of its own: every operation loads a
//! consistent snapshot, runs the pure [`GameLedger`] core over it, and
//! persists whatever changed. Serialization of concurrent writers for the
//! same game is the repository's job (row-level locking in the Postgres
//! implementation).

use std::sync::Arc;

use log::{info, warn};

use super::{
    errors::{LedgerError, LedgerResult},
    ledger::GameLedger,
    models::{Game, GameId, PlayerId},
};
use crate::{db::GameRepository, money::Money};

/// Game manager
#[derive(Clone)]
pub struct GameManager {
    repo: Arc<dyn GameRepository>,
}

impl GameManager {
    /// Create a new game manager backed by the given repository.
    pub fn new(repo: Arc<dyn GameRepository>) -> Self {
        Self { repo }
    }

    async fn load_ledger(&self, game_id: GameId) -> LedgerResult<GameLedger> {
        let game = self.repo.load_game(game_id).await?;
        let entries = self.repo.load_player_entries(game_id).await?;
        Ok(GameLedger::new(game, entries))
    }

    /// Record a buy-in for a player in an open game.
    pub async fn record_buy_in(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        amount: Money,
    ) -> LedgerResult<()> {
        let mut ledger = self.load_ledger(game_id).await?;
        ledger.record_buy_in(player_id, amount)?;

        let entry = ledger
            .entry(player_id)
            .ok_or(LedgerError::PlayerNotInGame(player_id))?;
        self.repo.save_player_entry(entry).await?;
        info!("Recorded {amount} buy-in for player {player_id} in game {game_id}");
        Ok(())
    }

    /// Record (or correct) a player's cash-out in an open game.
    pub async fn record_cash_out(
        &self,
        game_id: GameId,
        player_id: PlayerId,
        amount: Money,
    ) -> LedgerResult<()> {
        let mut ledger = self.load_ledger(game_id).await?;
        ledger.record_cash_out(player_id, amount)?;

        let entry = ledger
            .entry(player_id)
            .ok_or(LedgerError::PlayerNotInGame(player_id))?;
        self.repo.save_player_entry(entry).await?;
        info!("Recorded {amount} cash-out for player {player_id} in game {game_id}");
        Ok(())
    }

    /// Close a game after verifying the zero-sum invariant.
    ///
    /// Returns the completed game on success. An out-of-balance ledger
    /// blocks the close and is logged, since it indicates a real-money
    /// discrepancy someone needs to look at.
    pub async fn close_game(&self, game_id: GameId) -> LedgerResult<Game> {
        let mut ledger = self.load_ledger(game_id).await?;
        if let Err(err) = ledger.close_game() {
            if let LedgerError::LedgerImbalance { residual, .. } = &err {
                warn!("Refusing to close game {game_id}: ledger out of balance by {residual}");
            }
            return Err(err);
        }

        self.repo.save_game(ledger.game()).await?;
        info!("Closed game {game_id}");
        Ok(ledger.game().clone())
    }

    /// Signed profit for one player in a game.
    pub async fn profit_of(&self, game_id: GameId, player_id: PlayerId) -> LedgerResult<Money> {
        let ledger = self.load_ledger(game_id).await?;
        ledger.profit_of(player_id)
    }
}
