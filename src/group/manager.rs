//! Group manager rolling up per-game results for reporting.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::info;

use super::{
    aggregator::{self, CompletedGame},
    errors::{GroupError, GroupResult},
    models::GroupLedgerSnapshot,
};
use crate::{
    db::{GameRepository, PaymentRepository},
    game::{GroupId, PlayerId},
    money::Money,
    payment::{Payment, PaymentTracker},
    settlement::SettlementSuggestion,
};

/// Group manager
#[derive(Clone)]
pub struct GroupManager {
    game_repo: Arc<dyn GameRepository>,
    payment_repo: Arc<dyn PaymentRepository>,
}

impl GroupManager {
    /// Create a new group manager backed by the given repositories.
    pub fn new(game_repo: Arc<dyn GameRepository>, payment_repo: Arc<dyn PaymentRepository>) -> Self {
        Self {
            game_repo,
            payment_repo,
        }
    }

    async fn load_completed(
        &self,
        group_id: GroupId,
    ) -> GroupResult<(Vec<CompletedGame>, Vec<Payment>)> {
        let games = self.game_repo.load_completed_games(group_id).await?;
        let mut completed = Vec::with_capacity(games.len());
        let mut payments = Vec::new();
        for game in games {
            let entries = self.game_repo.load_player_entries(game.id).await?;
            payments.extend(self.payment_repo.load_payments(game.id).await?);
            completed.push((game, entries));
        }
        Ok((completed, payments))
    }

    /// Per-player running totals over the group's completed games.
    pub async fn aggregate(
        &self,
        group_id: GroupId,
    ) -> GroupResult<BTreeMap<PlayerId, GroupLedgerSnapshot>> {
        let (completed, payments) = self.load_completed(group_id).await?;
        Ok(aggregator::aggregate(&completed, &payments))
    }

    /// Propose transfers clearing the group's outstanding balances,
    /// netted across all unsettled games.
    pub async fn plan_group_settlement(
        &self,
        group_id: GroupId,
    ) -> GroupResult<Vec<SettlementSuggestion>> {
        let (completed, payments) = self.load_completed(group_id).await?;
        let plan = aggregator::plan_group_settlement(&completed, &payments)?;
        info!(
            "Planned group settlement for group {group_id}: {} transfer(s)",
            plan.len()
        );
        Ok(plan)
    }

    /// Verify a player can leave the group without orphaning money.
    ///
    /// Removal is blocked while the player has chips in any open game or
    /// a non-zero balance in any unsettled completed game, even when
    /// those positions happen to net to zero across games, since each
    /// game still needs them to settle.
    pub async fn check_member_removal(
        &self,
        group_id: GroupId,
        player_id: PlayerId,
    ) -> GroupResult<()> {
        let mut net = Money::ZERO;
        let mut entangled = false;

        for game in self.game_repo.load_open_games(group_id).await? {
            let entries = self.game_repo.load_player_entries(game.id).await?;
            if let Some(entry) = entries.iter().find(|e| e.player_id == player_id) {
                entangled = true;
                net += entry.profit();
            }
        }

        let (completed, payments) = self.load_completed(group_id).await?;
        for (game, entries) in &completed {
            let game_payments: Vec<Payment> = payments
                .iter()
                .filter(|p| p.game_id == game.id)
                .cloned()
                .collect();
            let tracker = PaymentTracker::new(
                entries.iter().map(|e| (e.player_id, e.profit())),
                &game_payments,
                Money::ZERO,
            );
            if let Some(&balance) = tracker.outstanding_balances().get(&player_id) {
                if !balance.is_zero() {
                    entangled = true;
                    net += balance;
                }
            }
        }

        if entangled {
            return Err(GroupError::OutstandingBalance {
                player_id,
                amount: net,
            });
        }
        Ok(())
    }
}
