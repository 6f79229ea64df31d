//! Core ledger engine for credeb.
//! This crate is the single source of truth for ledger invariants: people,
//! transactions, dues, balances and their persistence per namespace.

pub mod aggregate;
pub mod db;
pub mod export;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use aggregate::balance::{balance_of, totals_for, PersonTotals};
pub use aggregate::display::{format_amount, plain_amount};
pub use aggregate::rows::{
    balance_series, dues_rows, history_rows, summary_rows, SummaryRow, SummaryRows,
};
pub use export::csv_export::{export_file_name, transactions_csv, ExportError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::ledger::{
    parse_amount, parse_amount_checked, AmountError, Due, LedgerSnapshot, RetainedEntries,
    Transaction, TransactionKind, UnknownTransactionKind,
};
pub use model::namespace::{Namespace, NamespaceError};
pub use repo::kv_repo::{
    KvRepository, MemoryKvRepository, RepoError, RepoResult, SqliteKvRepository,
};
pub use repo::snapshot::{load_snapshot, save_snapshot};
pub use service::ledger_store::{
    DueValidationError, LedgerStore, MutationOutcome, StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
