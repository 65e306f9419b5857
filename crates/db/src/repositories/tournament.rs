//! Tournament repository: tournament rows, entries and the multi-row commits.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

use super::error::{RepositoryError, is_unique_violation};
use super::player::set_points;
use crate::entities::sea_orm_active_enums::TournamentStatus;
use crate::entities::{players, tournament_entries, tournaments};

/// A tournament row with its entries in join order.
#[derive(Debug, Clone)]
pub struct TournamentWithEntries {
    /// The tournament record.
    pub tournament: tournaments::Model,
    /// Joined player ids ordered by position.
    pub players: Vec<String>,
}

/// Input for recording a join.
#[derive(Debug, Clone)]
pub struct JoinInput {
    /// Tournament id.
    pub tour_id: i64,
    /// Joining player.
    pub player_id: String,
    /// New balances of the player and their backers.
    pub balances: Vec<(String, i64)>,
}

/// Input for settling a tournament.
#[derive(Debug, Clone)]
pub struct SettleInput {
    /// Tournament id.
    pub tour_id: i64,
    /// Winning player.
    pub winner_id: String,
    /// Total prize.
    pub prize: i64,
    /// New balances of the winner and their backers.
    pub balances: Vec<(String, i64)>,
}

/// Converts the number of existing entries into the next join position.
fn entry_position(tour_id: i64, existing: u64) -> Result<i32, RepositoryError> {
    i32::try_from(existing).map_err(|_| RepositoryError::EntryLimit(tour_id))
}

/// Tournament repository.
#[derive(Debug, Clone)]
pub struct TournamentRepository {
    db: DatabaseConnection,
}

impl TournamentRepository {
    /// Creates a new tournament repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts an open tournament.
    ///
    /// # Errors
    ///
    /// Returns `TournamentExists` if the id is taken.
    pub async fn create(
        &self,
        tour_id: i64,
        deposit: i64,
    ) -> Result<tournaments::Model, RepositoryError> {
        let tournament = tournaments::ActiveModel {
            tour_id: Set(tour_id),
            deposit: Set(deposit),
            status: Set(TournamentStatus::Open),
            winner_id: Set(None),
            prize: Set(None),
            created_at: Set(chrono::Utc::now()),
            settled_at: Set(None),
        };

        tournament.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::TournamentExists(tour_id)
            } else {
                e.into()
            }
        })
    }

    /// Finds a tournament with its entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_with_entries(
        &self,
        tour_id: i64,
    ) -> Result<Option<TournamentWithEntries>, RepositoryError> {
        let Some(tournament) = tournaments::Entity::find_by_id(tour_id).one(&self.db).await? else {
            return Ok(None);
        };

        let players = tournament_entries::Entity::find()
            .filter(tournament_entries::Column::TourId.eq(tour_id))
            .order_by_asc(tournament_entries::Column::Position)
            .all(&self.db)
            .await?
            .into_iter()
            .map(|entry| entry.player_id)
            .collect();

        Ok(Some(TournamentWithEntries {
            tournament,
            players,
        }))
    }

    /// Appends an entry without touching balances.
    ///
    /// # Errors
    ///
    /// Returns `TournamentNotFound`, `PlayerNotFound` or `AlreadyJoined`.
    pub async fn add_entry(&self, tour_id: i64, player_id: &str) -> Result<(), RepositoryError> {
        self.commit_join(JoinInput {
            tour_id,
            player_id: player_id.to_string(),
            balances: Vec::new(),
        })
        .await
    }

    /// Writes the balances of a join and appends the entry in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `TournamentNotFound`, `PlayerNotFound` or `AlreadyJoined`;
    /// nothing is written on error.
    pub async fn commit_join(&self, input: JoinInput) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        if tournaments::Entity::find_by_id(input.tour_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(RepositoryError::TournamentNotFound(input.tour_id));
        }
        if players::Entity::find_by_id(input.player_id.clone())
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(RepositoryError::PlayerNotFound(input.player_id));
        }
        let existing =
            tournament_entries::Entity::find_by_id((input.tour_id, input.player_id.clone()))
                .one(&txn)
                .await?;
        if existing.is_some() {
            return Err(RepositoryError::AlreadyJoined {
                tour_id: input.tour_id,
                player_id: input.player_id,
            });
        }

        for (player_id, points) in &input.balances {
            set_points(&txn, player_id, *points).await?;
        }

        let position = tournament_entries::Entity::find()
            .filter(tournament_entries::Column::TourId.eq(input.tour_id))
            .count(&txn)
            .await?;
        let entry = tournament_entries::ActiveModel {
            tour_id: Set(input.tour_id),
            player_id: Set(input.player_id),
            position: Set(entry_position(input.tour_id, position)?),
        };
        entry.insert(&txn).await?;

        txn.commit().await?;
        debug!(tour_id = input.tour_id, position, "Committed tournament entry");
        Ok(())
    }

    /// Writes the payouts and marks the tournament settled in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `TournamentNotFound` or `PlayerNotFound`; nothing is written
    /// on error.
    pub async fn commit_settlement(&self, input: SettleInput) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;

        let Some(tournament) = tournaments::Entity::find_by_id(input.tour_id)
            .one(&txn)
            .await?
        else {
            return Err(RepositoryError::TournamentNotFound(input.tour_id));
        };

        for (player_id, points) in &input.balances {
            set_points(&txn, player_id, *points).await?;
        }

        let mut tournament: tournaments::ActiveModel = tournament.into();
        tournament.status = Set(TournamentStatus::Settled);
        tournament.winner_id = Set(Some(input.winner_id));
        tournament.prize = Set(Some(input.prize));
        tournament.settled_at = Set(Some(chrono::Utc::now()));
        tournament.update(&txn).await?;

        txn.commit().await?;
        debug!(tour_id = input.tour_id, "Committed settlement");
        Ok(())
    }

    /// Deletes every entry, tournament and player in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if a delete fails.
    pub async fn delete_all(&self) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;
        tournament_entries::Entity::delete_many().exec(&txn).await?;
        tournaments::Entity::delete_many().exec(&txn).await?;
        players::Entity::delete_many().exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }
}
