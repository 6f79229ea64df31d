//! CSV export of the transaction log.
//!
//! # Invariants
//! - Header is exactly `Date,Name,Type,Amount`.
//! - One record per transaction, insertion order, `\n` terminated.
//! - Amounts are plain decimals without currency symbols.

use crate::aggregate::display::plain_amount;
use crate::model::ledger::Transaction;
use crate::model::namespace::Namespace;
use std::error::Error;
use std::fmt::{Display, Formatter};

const CSV_HEADER: [&str; 4] = ["Date", "Name", "Type", "Amount"];

#[derive(Debug)]
pub enum ExportError {
    /// Nothing to export for the active ledger.
    Empty,
    Csv(csv::Error),
    Encoding(String),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "No transactions to export."),
            Self::Csv(err) => write!(f, "csv write failed: {err}"),
            Self::Encoding(message) => write!(f, "csv output is not valid UTF-8: {message}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Csv(err) => Some(err),
            _ => None,
        }
    }
}

impl From<csv::Error> for ExportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

/// File name for the export of `namespace`, e.g. `sales_transactions.csv`.
pub fn export_file_name(namespace: &Namespace) -> String {
    format!("{}_transactions.csv", namespace.as_str())
}

/// Renders `transactions` as CSV text.
///
/// Fails with `ExportError::Empty` when there is nothing to export.
pub fn transactions_csv(transactions: &[Transaction]) -> Result<String, ExportError> {
    if transactions.is_empty() {
        return Err(ExportError::Empty);
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;
    for txn in transactions {
        let amount = plain_amount(txn.amount);
        writer.write_record([
            txn.date.as_str(),
            txn.person.as_str(),
            txn.kind.as_str(),
            amount.as_str(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Encoding(err.to_string()))?;
    String::from_utf8(bytes).map_err(|err| ExportError::Encoding(err.to_string()))
}
