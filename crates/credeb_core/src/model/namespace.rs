//! Ledger namespace identity.
//!
//! # Responsibility
//! - Validate namespace identifiers before they reach storage keys.
//! - Derive the namespace-qualified keys for each persisted collection.
//!
//! # Invariants
//! - A namespace is non-empty and limited to ASCII alphanumerics, `-`, `_`.
//! - Two namespaces never share a storage key.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const PURCHASE: &str = "purchase";
const SALES: &str = "sales";

/// Validation error for namespace identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NamespaceError {
    Empty,
    InvalidCharacter { namespace: String, ch: char },
}

impl Display for NamespaceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "ledger namespace cannot be empty"),
            Self::InvalidCharacter { namespace, ch } => write!(
                f,
                "ledger namespace `{namespace}` contains unsupported character `{ch}`"
            ),
        }
    }
}

impl Error for NamespaceError {}

/// Identifier of one independent ledger (for example `purchase` or `sales`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Namespace(String);

impl Namespace {
    /// Parses and validates a namespace identifier.
    ///
    /// Surrounding whitespace is ignored; the remaining text must be
    /// non-empty and made of ASCII letters, digits, `-` or `_`.
    pub fn parse(raw: &str) -> Result<Self, NamespaceError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(NamespaceError::Empty);
        }
        if let Some(ch) = trimmed
            .chars()
            .find(|ch| !(ch.is_ascii_alphanumeric() || *ch == '-' || *ch == '_'))
        {
            return Err(NamespaceError::InvalidCharacter {
                namespace: trimmed.to_string(),
                ch,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Ledger of credit purchases (amounts the user owes).
    pub fn purchase() -> Self {
        Self(PURCHASE.to_string())
    }

    /// Ledger of credit sales (amounts owed to the user).
    pub fn sales() -> Self {
        Self(SALES.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Human-facing heading for this ledger.
    pub fn title(&self) -> String {
        match self.0.as_str() {
            PURCHASE => "Credit Purchase".to_string(),
            SALES => "Credit Sales".to_string(),
            other => format!("Credit Ledger ({other})"),
        }
    }

    pub fn people_key(&self) -> String {
        format!("{}_people", self.0)
    }

    pub fn transactions_key(&self) -> String {
        format!("{}_transactions", self.0)
    }

    pub fn dues_key(&self) -> String {
        format!("{}_dues", self.0)
    }
}

impl Display for Namespace {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Namespace {
    type Err = NamespaceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::parse(value)
    }
}
