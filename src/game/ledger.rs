//! Per-game bookkeeping: buy-ins, cash-outs, and the zero-sum close check.

use std::collections::BTreeMap;

use chrono::Utc;

use super::{
    errors::{LedgerError, LedgerResult},
    models::{Game, GamePlayerEntry, GameState, PlayerId},
};
use crate::money::Money;

/// Authoritative buy-in/cash-out figures for one game.
///
/// Purely computational: built from a game plus its stored player entries,
/// mutated in memory, and handed back to the caller to persist. It performs
/// no I/O and never logs.
///
/// The central invariant: once a game is completed, the profits of all
/// entries sum to exactly zero. Cash only moves between the players and the
/// bank player; it is never created or destroyed. The bank player's own
/// figures get no special treatment: if they disagree with everyone
/// else's, [`GameLedger::close_game`] reports the discrepancy as
/// [`LedgerError::LedgerImbalance`] instead of auto-correcting, since that
/// usually means chips were miscounted.
#[derive(Debug, Clone)]
pub struct GameLedger {
    game: Game,
    entries: BTreeMap<PlayerId, GamePlayerEntry>,
}

impl GameLedger {
    /// Build a ledger from a game and its player entries.
    pub fn new(game: Game, entries: Vec<GamePlayerEntry>) -> Self {
        let entries = entries
            .into_iter()
            .map(|entry| (entry.player_id, entry))
            .collect();
        Self { game, entries }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Entries in ascending player-id order.
    pub fn entries(&self) -> impl Iterator<Item = &GamePlayerEntry> {
        self.entries.values()
    }

    pub fn entry(&self, player_id: PlayerId) -> Option<&GamePlayerEntry> {
        self.entries.get(&player_id)
    }

    /// Record a buy-in for a player, creating their entry on first buy-in.
    ///
    /// The engine enforces no upper bound; table-specific caps are a
    /// caller concern.
    ///
    /// # Errors
    ///
    /// * `LedgerError::InvalidAmount` - Amount is not positive
    /// * `LedgerError::GameNotOpen` - Game already completed
    pub fn record_buy_in(&mut self, player_id: PlayerId, amount: Money) -> LedgerResult<()> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(amount));
        }
        if !self.game.is_open() {
            return Err(LedgerError::GameNotOpen(self.game.id));
        }

        let entry = self
            .entries
            .entry(player_id)
            .or_insert_with(|| GamePlayerEntry::new(self.game.id, player_id));
        entry.buy_in += amount;
        Ok(())
    }

    /// Record a player's cash-out.
    ///
    /// Replaces any previously recorded value, so an entry can be
    /// corrected while the game is still open.
    ///
    /// # Errors
    ///
    /// * `LedgerError::InvalidAmount` - Amount is negative
    /// * `LedgerError::GameNotOpen` - Game already completed
    /// * `LedgerError::PlayerNotInGame` - Player never bought in
    pub fn record_cash_out(&mut self, player_id: PlayerId, amount: Money) -> LedgerResult<()> {
        if amount.is_negative() {
            return Err(LedgerError::InvalidAmount(amount));
        }
        if !self.game.is_open() {
            return Err(LedgerError::GameNotOpen(self.game.id));
        }

        let entry = self
            .entries
            .get_mut(&player_id)
            .ok_or(LedgerError::PlayerNotInGame(player_id))?;
        entry.cash_out = Some(amount);
        Ok(())
    }

    /// Close the game: verify every stack was cashed out and the pot is
    /// zero-sum, then mark the game completed.
    ///
    /// A non-zero residual means a data-entry mistake upstream (a stack
    /// never counted, a typo in a cash-out) and blocks the close rather
    /// than being rounded away.
    ///
    /// # Errors
    ///
    /// * `LedgerError::GameNotOpen` - Game already completed
    /// * `LedgerError::MissingCashOut` - Players with chips still on the table
    /// * `LedgerError::LedgerImbalance` - Profits do not sum to zero
    pub fn close_game(&mut self) -> LedgerResult<()> {
        if !self.game.is_open() {
            return Err(LedgerError::GameNotOpen(self.game.id));
        }

        let missing: Vec<PlayerId> = self
            .entries
            .values()
            .filter(|entry| !entry.has_cashed_out())
            .map(|entry| entry.player_id)
            .collect();
        if !missing.is_empty() {
            return Err(LedgerError::MissingCashOut(missing));
        }

        let residual: Money = self.entries.values().map(GamePlayerEntry::profit).sum();
        if !residual.is_zero() {
            return Err(LedgerError::LedgerImbalance {
                residual,
                profits: self.profits(),
            });
        }

        self.game.state = GameState::Completed;
        self.game.ended_at = Some(Utc::now());
        Ok(())
    }

    /// Signed profit for one player.
    ///
    /// # Errors
    ///
    /// * `LedgerError::PlayerNotInGame` - Player has no entry
    pub fn profit_of(&self, player_id: PlayerId) -> LedgerResult<Money> {
        self.entries
            .get(&player_id)
            .map(GamePlayerEntry::profit)
            .ok_or(LedgerError::PlayerNotInGame(player_id))
    }

    /// Per-player profits in ascending player-id order.
    pub fn profits(&self) -> Vec<(PlayerId, Money)> {
        self.entries
            .values()
            .map(|entry| (entry.player_id, entry.profit()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::Utc;

    fn open_game() -> Game {
        Game {
            id: 1,
            group_id: 10,
            stakes: "1/2 NL".to_string(),
            default_buy_in: Money::from_minor(2500),
            bank_player_id: 100,
            state: GameState::Open,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    fn cents(units: i64) -> Money {
        Money::from_minor(units)
    }

    #[test]
    fn test_buy_ins_accumulate() {
        let mut ledger = GameLedger::new(open_game(), vec![]);
        ledger.record_buy_in(100, cents(2500)).unwrap();
        ledger.record_buy_in(100, cents(1500)).unwrap();
        assert_eq!(ledger.entry(100).unwrap().buy_in, cents(4000));
    }

    #[test]
    fn test_buy_in_must_be_positive() {
        let mut ledger = GameLedger::new(open_game(), vec![]);
        assert!(matches!(
            ledger.record_buy_in(100, cents(0)),
            Err(LedgerError::InvalidAmount(_))
        ));
        assert!(matches!(
            ledger.record_buy_in(100, cents(-50)),
            Err(LedgerError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_cash_out_requires_entry() {
        let mut ledger = GameLedger::new(open_game(), vec![]);
        assert!(matches!(
            ledger.record_cash_out(999, cents(100)),
            Err(LedgerError::PlayerNotInGame(999))
        ));
    }

    #[test]
    fn test_cash_out_can_be_corrected_while_open() {
        let mut ledger = GameLedger::new(open_game(), vec![]);
        ledger.record_buy_in(100, cents(2500)).unwrap();
        ledger.record_cash_out(100, cents(3000)).unwrap();
        ledger.record_cash_out(100, cents(2500)).unwrap();
        assert_eq!(ledger.entry(100).unwrap().cash_out, Some(cents(2500)));
    }

    #[test]
    fn test_close_balanced_game() {
        let mut ledger = GameLedger::new(open_game(), vec![]);
        ledger.record_buy_in(100, cents(2500)).unwrap();
        ledger.record_buy_in(101, cents(2500)).unwrap();
        ledger.record_cash_out(100, cents(4000)).unwrap();
        ledger.record_cash_out(101, cents(1000)).unwrap();
        ledger.close_game().unwrap();

        assert_eq!(ledger.game().state, GameState::Completed);
        assert!(ledger.game().ended_at.is_some());
        assert_eq!(ledger.profit_of(100).unwrap(), cents(1500));
        assert_eq!(ledger.profit_of(101).unwrap(), cents(-1500));
    }

    #[test]
    fn test_close_blocks_on_missing_cash_out() {
        let mut ledger = GameLedger::new(open_game(), vec![]);
        ledger.record_buy_in(100, cents(2500)).unwrap();
        ledger.record_buy_in(101, cents(2500)).unwrap();
        ledger.record_cash_out(100, cents(2500)).unwrap();

        match ledger.close_game() {
            Err(LedgerError::MissingCashOut(players)) => assert_eq!(players, vec![101]),
            other => panic!("expected MissingCashOut, got {other:?}"),
        }
    }

    #[test]
    fn test_close_reports_one_cent_residual() {
        let mut ledger = GameLedger::new(open_game(), vec![]);
        ledger.record_buy_in(100, cents(2500)).unwrap();
        ledger.record_buy_in(101, cents(2500)).unwrap();
        ledger.record_cash_out(100, cents(4000)).unwrap();
        // Off by one cent: 1001 instead of 1000
        ledger.record_cash_out(101, cents(1001)).unwrap();

        match ledger.close_game() {
            Err(LedgerError::LedgerImbalance { residual, profits }) => {
                assert_eq!(residual, cents(1));
                assert_eq!(profits.len(), 2);
            }
            other => panic!("expected LedgerImbalance, got {other:?}"),
        }
        // The close was blocked; the game is still open
        assert_eq!(ledger.game().state, GameState::Open);
    }

    #[test]
    fn test_no_mutation_after_close() {
        let mut ledger = GameLedger::new(open_game(), vec![]);
        ledger.record_buy_in(100, cents(1000)).unwrap();
        ledger.record_buy_in(101, cents(1000)).unwrap();
        ledger.record_cash_out(100, cents(2000)).unwrap();
        ledger.record_cash_out(101, cents(0)).unwrap();
        ledger.close_game().unwrap();

        assert!(matches!(
            ledger.record_buy_in(100, cents(500)),
            Err(LedgerError::GameNotOpen(1))
        ));
        assert!(matches!(
            ledger.record_cash_out(100, cents(500)),
            Err(LedgerError::GameNotOpen(1))
        ));
        assert!(matches!(
            ledger.close_game(),
            Err(LedgerError::GameNotOpen(1))
        ));
    }

    #[test]
    fn test_bank_player_discrepancy_surfaces_as_imbalance() {
        // The bank player (100) enters figures that disagree with the
        // zero-sum implied by everyone else. Not auto-corrected.
        let mut ledger = GameLedger::new(open_game(), vec![]);
        ledger.record_buy_in(100, cents(2500)).unwrap();
        ledger.record_buy_in(101, cents(2500)).unwrap();
        ledger.record_cash_out(101, cents(4000)).unwrap();
        // Implied bank cash-out is 1000, but they counted 1200
        ledger.record_cash_out(100, cents(1200)).unwrap();

        match ledger.close_game() {
            Err(LedgerError::LedgerImbalance { residual, .. }) => {
                assert_eq!(residual, cents(200));
            }
            other => panic!("expected LedgerImbalance, got {other:?}"),
        }
    }
}
