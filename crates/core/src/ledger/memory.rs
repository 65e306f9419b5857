//! In-memory [`AccountStore`] used by tests and throwaway servers.

use std::collections::HashMap;

use async_trait::async_trait;
use backer_shared::{PlayerId, Points, TournamentId};
use tokio::sync::RwLock;

use super::store::{
    AccountStore, JoinCommit, SettlementCommit, StoreError, TournamentRecord, TournamentStatus,
};

#[derive(Debug, Default)]
struct Tables {
    players: HashMap<PlayerId, Points>,
    tournaments: HashMap<TournamentId, TournamentRecord>,
}

impl Tables {
    fn ensure_players<'a>(
        &self,
        mut ids: impl Iterator<Item = &'a PlayerId>,
    ) -> Result<(), StoreError> {
        match ids.find(|id| !self.players.contains_key(*id)) {
            Some(missing) => Err(StoreError::PlayerNotFound(missing.clone())),
            None => Ok(()),
        }
    }

    fn tournament_mut(
        &mut self,
        tour_id: TournamentId,
    ) -> Result<&mut TournamentRecord, StoreError> {
        self.tournaments
            .get_mut(&tour_id)
            .ok_or(StoreError::TournamentNotFound(tour_id))
    }

    fn check_can_join(&self, tour_id: TournamentId, player_id: &PlayerId) -> Result<(), StoreError> {
        let tournament = self
            .tournaments
            .get(&tour_id)
            .ok_or(StoreError::TournamentNotFound(tour_id))?;
        self.ensure_players(std::iter::once(player_id))?;
        if tournament.players.contains(player_id) {
            return Err(StoreError::AlreadyJoined {
                tour_id,
                player_id: player_id.clone(),
            });
        }
        Ok(())
    }
}

/// Store keeping every table in process memory.
///
/// Each call takes the table lock once, so multi-row commits are atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_account(&self, player_id: &PlayerId, points: Points) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.players.contains_key(player_id) {
            return Err(StoreError::PlayerExists(player_id.clone()));
        }
        tables.players.insert(player_id.clone(), points);
        Ok(())
    }

    async fn get_balance(&self, player_id: &PlayerId) -> Result<Points, StoreError> {
        self.tables
            .read()
            .await
            .players
            .get(player_id)
            .copied()
            .ok_or_else(|| StoreError::PlayerNotFound(player_id.clone()))
    }

    async fn get_balances(
        &self,
        player_ids: &[PlayerId],
    ) -> Result<HashMap<PlayerId, Points>, StoreError> {
        let tables = self.tables.read().await;
        Ok(player_ids
            .iter()
            .filter_map(|id| tables.players.get(id).map(|points| (id.clone(), *points)))
            .collect())
    }

    async fn set_balance(&self, player_id: &PlayerId, points: Points) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        let balance = tables
            .players
            .get_mut(player_id)
            .ok_or_else(|| StoreError::PlayerNotFound(player_id.clone()))?;
        *balance = points;
        Ok(())
    }

    async fn create_tournament(
        &self,
        tour_id: TournamentId,
        deposit: Points,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.tournaments.contains_key(&tour_id) {
            return Err(StoreError::TournamentExists(tour_id));
        }
        tables.tournaments.insert(
            tour_id,
            TournamentRecord {
                id: tour_id,
                deposit,
                players: Vec::new(),
                status: TournamentStatus::Open,
                winner: None,
            },
        );
        Ok(())
    }

    async fn get_tournament(&self, tour_id: TournamentId) -> Result<TournamentRecord, StoreError> {
        self.tables
            .read()
            .await
            .tournaments
            .get(&tour_id)
            .cloned()
            .ok_or(StoreError::TournamentNotFound(tour_id))
    }

    async fn record_join(
        &self,
        tour_id: TournamentId,
        player_id: &PlayerId,
    ) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.check_can_join(tour_id, player_id)?;
        tables.tournament_mut(tour_id)?.players.push(player_id.clone());
        Ok(())
    }

    async fn commit_join(&self, join: &JoinCommit) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.check_can_join(join.tour_id, &join.player_id)?;
        tables.ensure_players(join.balances.iter().map(|(id, _)| id))?;

        for (id, points) in &join.balances {
            tables.players.insert(id.clone(), *points);
        }
        tables
            .tournament_mut(join.tour_id)?
            .players
            .push(join.player_id.clone());
        Ok(())
    }

    async fn commit_settlement(&self, settlement: &SettlementCommit) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.tournament_mut(settlement.tour_id)?;
        tables.ensure_players(settlement.balances.iter().map(|(id, _)| id))?;

        for (id, points) in &settlement.balances {
            tables.players.insert(id.clone(), *points);
        }
        let tournament = tables.tournament_mut(settlement.tour_id)?;
        tournament.status = TournamentStatus::Settled;
        tournament.winner = Some(settlement.winner.clone());
        Ok(())
    }

    async fn reset(&self) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.players.clear();
        tables.tournaments.clear();
        Ok(())
    }
}
