//! Ledger error types for validation, funding and lifecycle errors.
//!
//! Every rule the engine enforces has its own variant so callers can match on
//! the exact failure, while `error_code()` gives the stable API code.

use backer_shared::{AppError, PlayerId, Points, TournamentId};
use thiserror::Error;

use super::store::StoreError;

/// Errors that can occur during ledger operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerError {
    // ========== Argument Errors ==========
    /// Amounts moved through the ledger must be strictly positive.
    #[error("Amount must be positive, got {0}")]
    InvalidAmount(Points),

    /// A player cannot back their own entry.
    #[error("Player {0} cannot back their own entry")]
    InvalidBacker(PlayerId),

    // ========== Lookup Errors ==========
    /// Player account not found.
    #[error("Player not found: {0}")]
    PlayerNotFound(PlayerId),

    /// Tournament not found.
    #[error("Tournament not found: {0}")]
    TournamentNotFound(TournamentId),

    /// Batch lookup returned a different number of rows than requested.
    #[error("Query returned {found} balances for {requested} requested players")]
    InvalidQueryResult {
        /// Number of ids asked for.
        requested: usize,
        /// Number of balances returned.
        found: usize,
    },

    // ========== Conflict Errors ==========
    /// Player account already exists.
    #[error("Player already exists: {0}")]
    AccountExists(PlayerId),

    /// Tournament id is already used by a stored tournament.
    #[error("Tournament already exists: {0}")]
    TournamentExists(TournamentId),

    /// Player is already in the tournament.
    #[error("Player {player_id} already joined tournament {tour_id}")]
    AlreadyJoined {
        /// The tournament.
        tour_id: TournamentId,
        /// The player.
        player_id: PlayerId,
    },

    // ========== Balance Errors ==========
    /// Balance does not cover the requested debit.
    #[error("Insufficient funds for {player_id}: balance {available}, needs {requested}")]
    InsufficientFunds {
        /// The player whose balance is short.
        player_id: PlayerId,
        /// Current balance.
        available: Points,
        /// Amount the operation needed.
        requested: Points,
    },

    /// Crediting would overflow the balance.
    #[error("Balance overflow for player {0}")]
    BalanceOverflow(PlayerId),

    // ========== Lifecycle Errors ==========
    /// Another tournament is still open.
    #[error("Tournament {0} is already announced and not settled yet")]
    TournamentAlreadyAnnounced(TournamentId),

    /// The tournament exists but is not the one open for joining.
    #[error("Tournament {0} is not open for joining")]
    TournamentNotActive(TournamentId),

    // ========== Storage Errors ==========
    /// Store failure.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidBacker(_) => "INVALID_BACKER",
            Self::PlayerNotFound(_) => "PLAYER_NOT_FOUND",
            Self::TournamentNotFound(_) => "TOURNAMENT_NOT_FOUND",
            Self::InvalidQueryResult { .. } => "INVALID_QUERY_RESULT",
            Self::AccountExists(_) => "ACCOUNT_EXISTS",
            Self::TournamentExists(_) => "TOURNAMENT_EXISTS",
            Self::AlreadyJoined { .. } => "ALREADY_JOINED",
            Self::InsufficientFunds { .. } => "INSUFFICIENT_FUNDS",
            Self::BalanceOverflow(_) => "BALANCE_OVERFLOW",
            Self::TournamentAlreadyAnnounced(_) => "TOURNAMENT_ALREADY_ANNOUNCED",
            Self::TournamentNotActive(_) => "TOURNAMENT_NOT_ACTIVE",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Returns true for unknown player or tournament lookups.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::PlayerNotFound(_) | Self::TournamentNotFound(_))
    }

    /// Returns true for duplicate accounts, tournaments and joins.
    #[must_use]
    pub fn is_already_exists(&self) -> bool {
        matches!(
            self,
            Self::AccountExists(_) | Self::TournamentExists(_) | Self::AlreadyJoined { .. }
        )
    }
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::PlayerNotFound(id) => Self::PlayerNotFound(id),
            StoreError::PlayerExists(id) => Self::AccountExists(id),
            StoreError::TournamentNotFound(id) => Self::TournamentNotFound(id),
            StoreError::TournamentExists(id) => Self::TournamentExists(id),
            StoreError::AlreadyJoined { tour_id, player_id } => {
                Self::AlreadyJoined { tour_id, player_id }
            }
            StoreError::Backend(msg) => Self::Storage(msg),
        }
    }
}

impl From<LedgerError> for AppError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Storage(msg) => Self::Database(msg),
            other => Self::Rejected {
                code: other.error_code(),
                message: other.to_string(),
            },
        }
    }
}
