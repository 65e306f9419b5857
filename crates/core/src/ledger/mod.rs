//! Player accounts and tournament settlement.
//!
//! This module implements the ledger functionality:
//! - Storage contract and the in-memory store
//! - Deposit and prize split arithmetic
//! - Winner selection and payouts
//! - The engine serializing every operation

pub mod engine;
pub mod error;
pub mod funding;
pub mod memory;
pub mod settlement;
pub mod state;
pub mod store;

#[cfg(test)]
mod engine_props;

pub use engine::LedgerEngine;
pub use error::LedgerError;
pub use funding::{FundingRecord, entry_contribution, prize_share};
pub use memory::MemoryStore;
pub use settlement::{payouts, select_winner};
pub use state::{ActiveTournament, TournamentState};
pub use store::{
    AccountStore, JoinCommit, SettlementCommit, StoreError, TournamentRecord, TournamentStatus,
    Winner,
};
