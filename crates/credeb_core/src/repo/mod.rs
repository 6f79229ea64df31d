//! Durable storage contracts and implementations.
//!
//! # Responsibility
//! - Define the key-value persistence contract used by the ledger store.
//! - Encode/decode namespace snapshots into namespace-qualified keys.
//!
//! # Invariants
//! - Each collection is stored under its own key and loads independently.
//! - Missing or undecodable collections load as empty, never as errors.

pub mod kv_repo;
pub mod snapshot;
