//! Core business logic for the back-a-friend ledger.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Storage is reached through the [`ledger::AccountStore`] trait.
//!
//! # Modules
//!
//! - `ledger` - Accounts, tournaments, backed joins and settlement

pub mod ledger;
