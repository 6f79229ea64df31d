//! Aggregation engine: pure projections over a ledger snapshot.
//!
//! # Responsibility
//! - Derive per-person totals and balances from the transaction log.
//! - Provide filtered, insertion-ordered views for presentation layers.
//!
//! # Invariants
//! - Functions never mutate or retain the collections they receive.
//! - Every produced row owns its data.
//! - Totals are recomputed from scratch on every call.

pub mod balance;
pub mod display;
pub mod rows;
