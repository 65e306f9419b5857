//! Shared types, errors, and configuration for the back-a-friend ledger.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for players and tournaments
//! - The `Points` amount type
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::AppConfig;
pub use error::AppError;
pub use types::{PlayerId, Points, TournamentId};
