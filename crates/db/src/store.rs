//! SQL-backed [`AccountStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::DatabaseConnection;

use backer_core::ledger::{
    AccountStore, JoinCommit, SettlementCommit, StoreError, TournamentRecord, TournamentStatus,
    Winner,
};
use backer_shared::{PlayerId, Points, TournamentId};

use crate::entities::sea_orm_active_enums;
use crate::repositories::{
    JoinInput, PlayerRepository, RepositoryError, SettleInput, TournamentRepository,
};

impl From<RepositoryError> for StoreError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::PlayerNotFound(id) => Self::PlayerNotFound(PlayerId::new(id)),
            RepositoryError::PlayerExists(id) => Self::PlayerExists(PlayerId::new(id)),
            RepositoryError::TournamentNotFound(id) => Self::TournamentNotFound(TournamentId(id)),
            RepositoryError::TournamentExists(id) => Self::TournamentExists(TournamentId(id)),
            RepositoryError::AlreadyJoined { tour_id, player_id } => Self::AlreadyJoined {
                tour_id: TournamentId(tour_id),
                player_id: PlayerId::new(player_id),
            },
            err @ RepositoryError::EntryLimit(_) => Self::Backend(err.to_string()),
            RepositoryError::Database(e) => Self::Backend(e.to_string()),
        }
    }
}

fn to_rows(balances: &[(PlayerId, Points)]) -> Vec<(String, i64)> {
    balances
        .iter()
        .map(|(id, points)| (id.as_str().to_string(), *points))
        .collect()
}

/// Account store persisting to any database `SeaORM` can reach.
#[derive(Debug, Clone)]
pub struct SqlAccountStore {
    players: PlayerRepository,
    tournaments: TournamentRepository,
}

impl SqlAccountStore {
    /// Creates a store over an open connection pool.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            players: PlayerRepository::new(db.clone()),
            tournaments: TournamentRepository::new(db),
        }
    }
}

#[async_trait]
impl AccountStore for SqlAccountStore {
    async fn create_account(&self, player_id: &PlayerId, points: Points) -> Result<(), StoreError> {
        self.players.create(player_id.as_str(), points).await?;
        Ok(())
    }

    async fn get_balance(&self, player_id: &PlayerId) -> Result<Points, StoreError> {
        self.players
            .find_by_id(player_id.as_str())
            .await?
            .map(|player| player.points)
            .ok_or_else(|| StoreError::PlayerNotFound(player_id.clone()))
    }

    async fn get_balances(
        &self,
        player_ids: &[PlayerId],
    ) -> Result<HashMap<PlayerId, Points>, StoreError> {
        let ids: Vec<String> = player_ids.iter().map(|id| id.as_str().to_string()).collect();
        let rows = self.players.find_points(&ids).await?;
        Ok(rows
            .into_iter()
            .map(|(id, points)| (PlayerId::new(id), points))
            .collect())
    }

    async fn set_balance(&self, player_id: &PlayerId, points: Points) -> Result<(), StoreError> {
        Ok(self.players.update_points(player_id.as_str(), points).await?)
    }

    async fn create_tournament(
        &self,
        tour_id: TournamentId,
        deposit: Points,
    ) -> Result<(), StoreError> {
        self.tournaments.create(tour_id.into_inner(), deposit).await?;
        Ok(())
    }

    async fn get_tournament(&self, tour_id: TournamentId) -> Result<TournamentRecord, StoreError> {
        let found = self
            .tournaments
            .find_with_entries(tour_id.into_inner())
            .await?
            .ok_or(StoreError::TournamentNotFound(tour_id))?;
        let row = found.tournament;

        let winner = match (row.winner_id, row.prize) {
            (Some(player_id), Some(prize)) => Some(Winner {
                player_id: PlayerId::new(player_id),
                prize,
            }),
            _ => None,
        };
        let status = match row.status {
            sea_orm_active_enums::TournamentStatus::Open => TournamentStatus::Open,
            sea_orm_active_enums::TournamentStatus::Settled => TournamentStatus::Settled,
        };

        Ok(TournamentRecord {
            id: tour_id,
            deposit: row.deposit,
            players: found.players.into_iter().map(PlayerId::new).collect(),
            status,
            winner,
        })
    }

    async fn record_join(
        &self,
        tour_id: TournamentId,
        player_id: &PlayerId,
    ) -> Result<(), StoreError> {
        Ok(self
            .tournaments
            .add_entry(tour_id.into_inner(), player_id.as_str())
            .await?)
    }

    async fn commit_join(&self, join: &JoinCommit) -> Result<(), StoreError> {
        Ok(self
            .tournaments
            .commit_join(JoinInput {
                tour_id: join.tour_id.into_inner(),
                player_id: join.player_id.as_str().to_string(),
                balances: to_rows(&join.balances),
            })
            .await?)
    }

    async fn commit_settlement(&self, settlement: &SettlementCommit) -> Result<(), StoreError> {
        Ok(self
            .tournaments
            .commit_settlement(SettleInput {
                tour_id: settlement.tour_id.into_inner(),
                winner_id: settlement.winner.player_id.as_str().to_string(),
                prize: settlement.winner.prize,
                balances: to_rows(&settlement.balances),
            })
            .await?)
    }

    async fn reset(&self) -> Result<(), StoreError> {
        Ok(self.tournaments.delete_all().await?)
    }
}
