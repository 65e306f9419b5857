//! Storage contract consumed by the ledger engine.
//!
//! The store owns durable rows only. All cross-row arithmetic and invariant
//! checks happen in the engine; the store guarantees that each call is atomic,
//! including the multi-row `commit_join` and `commit_settlement` units.

use std::collections::HashMap;

use async_trait::async_trait;
use backer_shared::{PlayerId, Points, TournamentId};
use serde::Serialize;
use thiserror::Error;

/// Errors returned by an [`AccountStore`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No account row for this player.
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    /// An account row for this player already exists.
    #[error("Player already exists: {0}")]
    PlayerExists(PlayerId),

    /// No tournament row with this id.
    #[error("Tournament not found: {0}")]
    TournamentNotFound(TournamentId),

    /// A tournament row with this id already exists.
    #[error("Tournament already exists: {0}")]
    TournamentExists(TournamentId),

    /// The player is already in the tournament's joined set.
    #[error("Player {player_id} already joined tournament {tour_id}")]
    AlreadyJoined {
        /// The tournament.
        tour_id: TournamentId,
        /// The player.
        player_id: PlayerId,
    },

    /// Backend failure (I/O, SQL, pool exhaustion).
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Lifecycle status persisted with a tournament row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStatus {
    /// Accepting joins.
    Open,
    /// Winner paid out; the row is kept for history.
    Settled,
}

/// Winner of a settled tournament.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Winner {
    /// The winning player.
    pub player_id: PlayerId,
    /// Total pot collected from every entrant.
    pub prize: Points,
}

/// A tournament row as read from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TournamentRecord {
    /// Tournament id.
    pub id: TournamentId,
    /// Entry deposit fixed at announcement.
    pub deposit: Points,
    /// Joined players in join order.
    pub players: Vec<PlayerId>,
    /// Lifecycle status.
    pub status: TournamentStatus,
    /// Winner, once settled.
    pub winner: Option<Winner>,
}

/// Balance writes and the join record of a single join.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinCommit {
    /// Tournament being joined.
    pub tour_id: TournamentId,
    /// Player appended to the joined set.
    pub player_id: PlayerId,
    /// New balances of the player and every backer.
    pub balances: Vec<(PlayerId, Points)>,
}

/// Balance writes and the winner record of a settlement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementCommit {
    /// Tournament being settled.
    pub tour_id: TournamentId,
    /// Winner and total prize.
    pub winner: Winner,
    /// New balances of the winner and every paid backer.
    pub balances: Vec<(PlayerId, Points)>,
}

/// Durable storage for player balances and tournament rows.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Creates an account with an opening balance.
    async fn create_account(&self, player_id: &PlayerId, points: Points) -> Result<(), StoreError>;

    /// Reads one balance.
    async fn get_balance(&self, player_id: &PlayerId) -> Result<Points, StoreError>;

    /// Reads the balances of every listed player that exists.
    ///
    /// Unknown ids are silently skipped and duplicates collapse, so callers
    /// compare the map size with the number of ids they asked for.
    async fn get_balances(
        &self,
        player_ids: &[PlayerId],
    ) -> Result<HashMap<PlayerId, Points>, StoreError>;

    /// Overwrites one balance.
    async fn set_balance(&self, player_id: &PlayerId, points: Points) -> Result<(), StoreError>;

    /// Creates an open tournament with no players.
    async fn create_tournament(
        &self,
        tour_id: TournamentId,
        deposit: Points,
    ) -> Result<(), StoreError>;

    /// Reads a tournament row with its joined players.
    async fn get_tournament(&self, tour_id: TournamentId) -> Result<TournamentRecord, StoreError>;

    /// Appends a player to a tournament's joined set.
    async fn record_join(
        &self,
        tour_id: TournamentId,
        player_id: &PlayerId,
    ) -> Result<(), StoreError>;

    /// Writes every balance of a join and records the join, all or nothing.
    async fn commit_join(&self, join: &JoinCommit) -> Result<(), StoreError>;

    /// Writes every balance of a settlement and marks the tournament settled,
    /// all or nothing.
    async fn commit_settlement(&self, settlement: &SettlementCommit) -> Result<(), StoreError>;

    /// Removes all players and tournaments.
    async fn reset(&self) -> Result<(), StoreError>;
}
