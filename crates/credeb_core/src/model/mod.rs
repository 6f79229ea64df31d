//! Ledger domain model.
//!
//! # Responsibility
//! - Define the people/transaction/due records owned by one ledger.
//! - Define the namespace identity that scopes every stored collection.
//!
//! # Invariants
//! - A person is identified by its exact (case-sensitive) name.
//! - Amounts are fixed-point decimals, never floats.

pub mod ledger;
pub mod namespace;
