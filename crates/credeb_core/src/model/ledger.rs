//! Ledger records: transactions, dues and the per-namespace snapshot.
//!
//! # Responsibility
//! - Define immutable transaction and due records.
//! - Keep the persisted JSON shape (`name`/`type` field names) stable.
//!
//! # Invariants
//! - `Transaction::amount` is strictly positive once accepted by the store.
//! - A blank due contact is represented as `None`.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Direction of one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    /// Increases the amount owed.
    Credit,
    /// Offsets prior credits.
    Payment,
}

impl TransactionKind {
    /// Stable lowercase token used in storage and CSV export.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Payment => "payment",
        }
    }

    /// Capitalized label used by history views.
    pub fn label(self) -> &'static str {
        match self {
            Self::Credit => "Credit",
            Self::Payment => "Payment",
        }
    }
}

impl Display for TransactionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text does not name a transaction kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTransactionKind(pub String);

impl Display for UnknownTransactionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unknown transaction kind `{}`; expected credit|payment",
            self.0
        )
    }
}

impl Error for UnknownTransactionKind {}

impl FromStr for TransactionKind {
    type Err = UnknownTransactionKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "credit" => Ok(Self::Credit),
            "payment" => Ok(Self::Payment),
            _ => Err(UnknownTransactionKind(value.to_string())),
        }
    }
}

/// One credit or payment entry for a person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Serialized as `name` to stay compatible with existing ledgers.
    #[serde(rename = "name")]
    pub person: String,
    /// User-supplied calendar date, stored verbatim.
    pub date: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
}

impl Transaction {
    pub fn new(
        person: impl Into<String>,
        date: impl Into<String>,
        amount: Decimal,
        kind: TransactionKind,
    ) -> Self {
        Self {
            person: person.into(),
            date: date.into(),
            amount,
            kind,
        }
    }

    /// Amount with the sign it contributes to a balance.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Credit => self.amount,
            TransactionKind::Payment => -self.amount,
        }
    }
}

/// Follow-up reminder to settle with a creditor.
///
/// Dues are independent of balances: settling a balance never clears one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Due {
    #[serde(rename = "name")]
    pub creditor: String,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub contact: Option<String>,
    pub date: String,
}

impl Due {
    /// Creates a due, folding a blank contact into `None`.
    pub fn new(creditor: impl Into<String>, contact: Option<&str>, date: impl Into<String>) -> Self {
        Self {
            creditor: creditor.into(),
            contact: normalize_contact(contact),
            date: date.into(),
        }
    }
}

/// Full in-memory state of one ledger namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerSnapshot {
    /// Person names in insertion order.
    pub people: Vec<String>,
    pub transactions: Vec<Transaction>,
    pub dues: Vec<Due>,
    pub retained: RetainedEntries,
}

impl LedgerSnapshot {
    /// True when nothing is visible; retained entries do not count.
    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.transactions.is_empty() && self.dues.is_empty()
    }
}

/// Stored entries that could not be loaded, kept verbatim.
///
/// They stay out of every view and are appended after the readable
/// entries of their collection on each save.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetainedEntries {
    pub people: Vec<Value>,
    pub transactions: Vec<Value>,
    pub dues: Vec<Value>,
}

impl RetainedEntries {
    pub fn is_empty(&self) -> bool {
        self.people.is_empty() && self.transactions.is_empty() && self.dues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.people.len() + self.transactions.len() + self.dues.len()
    }

    /// Drops retained records that name `person`.
    pub fn forget_person(&mut self, person: &str) {
        let names_person =
            |entry: &Value| entry.get("name").and_then(Value::as_str) == Some(person);
        self.people.retain(|entry| entry.as_str() != Some(person));
        self.transactions.retain(|entry| !names_person(entry));
        self.dues.retain(|entry| !names_person(entry));
    }
}

/// Why amount text was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountError {
    NotANumber,
    NotPositive,
    /// Numeric, but beyond what `Decimal` represents.
    OutOfRange,
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotANumber => write!(f, "amount is not a number"),
            Self::NotPositive => write!(f, "amount must be greater than zero"),
            Self::OutOfRange => write!(
                f,
                "amount is outside the supported range (up to {})",
                Decimal::MAX
            ),
        }
    }
}

impl Error for AmountError {}

/// Parses user-entered amount text, accepting plain and scientific notation.
pub fn parse_amount_checked(raw: &str) -> Result<Decimal, AmountError> {
    let raw = raw.trim();
    let amount = match Decimal::from_str(raw).or_else(|_| Decimal::from_scientific(raw)) {
        Ok(amount) => amount,
        Err(_) => {
            return Err(match raw.parse::<f64>() {
                Ok(value) if value.is_finite() && value <= 0.0 => AmountError::NotPositive,
                Ok(value) if value.is_finite() => AmountError::OutOfRange,
                _ => AmountError::NotANumber,
            })
        }
    };
    if amount > Decimal::ZERO {
        Ok(amount)
    } else {
        Err(AmountError::NotPositive)
    }
}

/// Parses user-entered amount text.
///
/// Returns `None` for non-numeric text, values that are not strictly
/// positive and values outside the `Decimal` range.
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    parse_amount_checked(raw).ok()
}

fn normalize_contact(contact: Option<&str>) -> Option<String> {
    contact
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(normalize_contact(value.as_deref()))
}
