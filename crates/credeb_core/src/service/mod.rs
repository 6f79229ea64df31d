//! Ledger use-case services.
//!
//! # Responsibility
//! - Own the active namespace snapshot and its durable repository.
//! - Expose the explicit mutation commands used by UI/CLI collaborators.

pub mod ledger_store;
