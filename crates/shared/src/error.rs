//! Application-wide error types.

use thiserror::Error;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request parameters were missing, repeated or malformed.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The ledger refused the operation.
    #[error("{message}")]
    Rejected {
        /// Stable machine-readable code of the ledger error.
        code: &'static str,
        /// Human-readable description.
        message: String,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    ///
    /// Only validation failures are reported as client errors; everything the
    /// ledger itself refuses is a generic failure.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Rejected { .. } | Self::Database(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Rejected { code, .. } => code,
            Self::Database(_) => "DATABASE_ERROR",
        }
    }
}
