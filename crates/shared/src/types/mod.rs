//! Common types used across the application.

pub mod id;

pub use id::*;

/// Integer amount of points held by or moved between players.
///
/// Points are whole units; every split in the ledger uses floor division.
pub type Points = i64;
