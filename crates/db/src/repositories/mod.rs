//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod error;
pub mod player;
pub mod tournament;

pub use error::RepositoryError;
pub use player::PlayerRepository;
pub use tournament::{JoinInput, SettleInput, TournamentRepository, TournamentWithEntries};
