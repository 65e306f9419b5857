//! Errors shared by the repositories.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Repository error types.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// No player row with this id.
    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    /// A player row with this id already exists.
    #[error("Player already exists: {0}")]
    PlayerExists(String),

    /// No tournament row with this id.
    #[error("Tournament not found: {0}")]
    TournamentNotFound(i64),

    /// A tournament row with this id already exists.
    #[error("Tournament already exists: {0}")]
    TournamentExists(i64),

    /// The player already has an entry in the tournament.
    #[error("Player {player_id} already joined tournament {tour_id}")]
    AlreadyJoined {
        /// Tournament id.
        tour_id: i64,
        /// Player id.
        player_id: String,
    },

    /// The tournament has more entries than a join position can index.
    #[error("Tournament {0} cannot take more entries")]
    EntryLimit(i64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Returns true if the error is a unique or primary key violation.
pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
