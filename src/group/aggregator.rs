//! Pure aggregation of per-game results into group-level running totals.
//!
//! Aggregation recomputes from scratch on every call. That is `O(games ×
//! players)`, which is fine for a ledger bounded by real-world game
//! cadence, and it trades a cached-balance staleness bug class for a
//! little CPU.

use std::collections::BTreeMap;

use super::models::GroupLedgerSnapshot;
use crate::{
    game::{Game, GameId, GamePlayerEntry, PlayerId},
    money::Money,
    payment::{Payment, PaymentTracker},
    settlement::{SettlementResult, SettlementSuggestion, plan_settlement},
};

/// A completed game together with its player entries.
pub type CompletedGame = (Game, Vec<GamePlayerEntry>);

fn tracker_for_game(
    entries: &[GamePlayerEntry],
    payments: &[Payment],
    game_id: GameId,
) -> PaymentTracker {
    let game_payments: Vec<Payment> = payments
        .iter()
        .filter(|p| p.game_id == game_id)
        .cloned()
        .collect();
    PaymentTracker::new(
        entries.iter().map(|e| (e.player_id, e.profit())),
        &game_payments,
        Money::ZERO,
    )
}

/// Fold completed games and their payments into one snapshot per player.
///
/// Pure function: identical inputs always produce identical snapshots.
pub fn aggregate(
    completed_games: &[CompletedGame],
    payments: &[Payment],
) -> BTreeMap<PlayerId, GroupLedgerSnapshot> {
    let mut snapshots: BTreeMap<PlayerId, GroupLedgerSnapshot> = BTreeMap::new();

    for (game, entries) in completed_games {
        for entry in entries {
            let snapshot = snapshots
                .entry(entry.player_id)
                .or_insert_with(|| GroupLedgerSnapshot::new(entry.player_id));
            let profit = entry.profit();
            snapshot.lifetime_profit += profit;
            snapshot.games_played += 1;
            if profit > snapshot.biggest_win {
                snapshot.biggest_win = profit;
            }
            if profit < snapshot.biggest_loss {
                snapshot.biggest_loss = profit;
            }
        }

        let tracker = tracker_for_game(entries, payments, game.id);
        if !tracker.is_fully_settled() {
            for (player_id, balance) in tracker.outstanding_balances() {
                let snapshot = snapshots
                    .entry(player_id)
                    .or_insert_with(|| GroupLedgerSnapshot::new(player_id));
                snapshot.outstanding += balance;
            }
        }
    }

    snapshots
}

/// Net signed balance per player across all not-yet-settled games.
///
/// Players who come out even across games are omitted, so the result can
/// feed [`plan_settlement`] directly.
pub fn group_outstanding_balances(
    completed_games: &[CompletedGame],
    payments: &[Payment],
) -> BTreeMap<PlayerId, Money> {
    let mut balances: BTreeMap<PlayerId, Money> = BTreeMap::new();

    for (game, entries) in completed_games {
        let tracker = tracker_for_game(entries, payments, game.id);
        if !tracker.is_fully_settled() {
            for (player_id, balance) in tracker.outstanding_balances() {
                *balances.entry(player_id).or_default() += balance;
            }
        }
    }

    balances.retain(|_, balance| !balance.is_zero());
    balances
}

/// Propose transfers clearing the group's outstanding balances.
///
/// Netting across games means a player who owes in one game and is owed
/// in another ends up with fewer (or zero) transfers than settling each
/// game separately.
pub fn plan_group_settlement(
    completed_games: &[CompletedGame],
    payments: &[Payment],
) -> SettlementResult<Vec<SettlementSuggestion>> {
    plan_settlement(&group_outstanding_balances(completed_games, payments))
}
