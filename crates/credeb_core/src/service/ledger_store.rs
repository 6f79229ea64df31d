//! Ledger store: the authoritative snapshot for one active namespace.
//!
//! # Responsibility
//! - Load a namespace snapshot and replace it wholesale on switch.
//! - Guard and apply the four mutations (add person, add transaction,
//!   add due, delete person).
//! - Persist the full snapshot after every applied mutation.
//!
//! # Invariants
//! - Person names are unique (exact match) within a namespace.
//! - Invalid or duplicate person/transaction input is ignored, not raised.
//! - Deleting a person removes every transaction and due that names it.
//! - When persistence fails the in-memory snapshot is left unchanged.
//! - Transaction persons and due creditors are not checked against people;
//!   callers populate choices from `people()`.
//! - Per-person credit and payment totals never exceed `Decimal::MAX`.

use crate::aggregate::balance::totals_for;
use crate::model::ledger::{parse_amount, Due, LedgerSnapshot, Transaction, TransactionKind};
use crate::model::namespace::Namespace;
use crate::repo::kv_repo::{KvRepository, RepoError};
use crate::repo::snapshot::{load_snapshot, save_snapshot};
use log::{debug, error, info};
use rust_decimal::Decimal;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Missing required field on `add_due`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DueValidationError {
    MissingCreditor,
    MissingDate,
}

impl Display for DueValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingCreditor => write!(f, "please select a creditor"),
            Self::MissingDate => write!(f, "please provide a due date"),
        }
    }
}

impl Error for DueValidationError {}

/// Error surfaced by store mutations.
#[derive(Debug)]
pub enum StoreError {
    Validation(DueValidationError),
    /// Snapshot could not be written; the in-memory state was restored.
    Persistence(RepoError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Persistence(err) => write!(f, "failed to save ledger: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<DueValidationError> for StoreError {
    fn from(value: DueValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for StoreError {
    fn from(value: RepoError) -> Self {
        Self::Persistence(value)
    }
}

/// Result of a mutation whose invalid input is silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationOutcome {
    /// State changed and was persisted.
    Applied,
    /// Input was empty, invalid, duplicate or unknown; nothing changed.
    Ignored,
}

impl MutationOutcome {
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Owner of the active namespace snapshot and its backing repository.
pub struct LedgerStore<R: KvRepository> {
    repo: R,
    namespace: Namespace,
    snapshot: LedgerSnapshot,
}

impl<R: KvRepository> LedgerStore<R> {
    /// Creates a store bound to `namespace`, loading its persisted snapshot.
    pub fn open(repo: R, namespace: Namespace) -> Self {
        let snapshot = load_snapshot(&repo, &namespace);
        log_loaded(&namespace, &snapshot);
        Self {
            repo,
            namespace,
            snapshot,
        }
    }

    /// Replaces the in-memory snapshot with the persisted one for `namespace`.
    ///
    /// Every mutation persists before returning, so nothing is lost for the
    /// namespace being left.
    pub fn select_namespace(&mut self, namespace: Namespace) {
        self.snapshot = load_snapshot(&self.repo, &namespace);
        self.namespace = namespace;
        log_loaded(&self.namespace, &self.snapshot);
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn snapshot(&self) -> &LedgerSnapshot {
        &self.snapshot
    }

    pub fn people(&self) -> &[String] {
        &self.snapshot.people
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.snapshot.transactions
    }

    pub fn dues(&self) -> &[Due] {
        &self.snapshot.dues
    }

    pub fn contains_person(&self, name: &str) -> bool {
        self.snapshot.people.iter().any(|person| person == name)
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Releases the repository, dropping the in-memory snapshot.
    pub fn into_repository(self) -> R {
        self.repo
    }

    /// Adds a person by trimmed name.
    ///
    /// Blank names and exact duplicates are ignored.
    pub fn add_person(&mut self, name: &str) -> StoreResult<MutationOutcome> {
        let name = name.trim();
        if name.is_empty() || self.contains_person(name) {
            return Ok(self.ignored("add_person"));
        }

        let name = name.to_string();
        self.commit("add_person", |snapshot| snapshot.people.push(name))?;
        Ok(MutationOutcome::Applied)
    }

    /// Appends a transaction when `person` and `date` are non-blank,
    /// `amount` is strictly positive and the person's total of that kind
    /// stays within `Decimal`; otherwise ignores the call.
    pub fn add_transaction(
        &mut self,
        person: &str,
        date: &str,
        amount: Decimal,
        kind: TransactionKind,
    ) -> StoreResult<MutationOutcome> {
        let (person, date) = (person.trim(), date.trim());
        if person.is_empty() || date.is_empty() || amount <= Decimal::ZERO {
            return Ok(self.ignored("add_transaction"));
        }
        if totals_for(person, self.transactions())
            .checked_add(kind, amount)
            .is_none()
        {
            debug!(
                "event=add_transaction module=store status=ignored namespace={} reason=total_overflow",
                self.namespace
            );
            return Ok(MutationOutcome::Ignored);
        }

        let txn = Transaction::new(person, date, amount, kind);
        self.commit("add_transaction", |snapshot| snapshot.transactions.push(txn))?;
        Ok(MutationOutcome::Applied)
    }

    /// Form-input variant of [`Self::add_transaction`].
    ///
    /// Unparsable amount or kind text is ignored like any other invalid input.
    pub fn add_transaction_input(
        &mut self,
        person: &str,
        date: &str,
        amount: &str,
        kind: &str,
    ) -> StoreResult<MutationOutcome> {
        match (parse_amount(amount), kind.parse::<TransactionKind>()) {
            (Some(amount), Ok(kind)) => self.add_transaction(person, date, amount, kind),
            _ => Ok(self.ignored("add_transaction")),
        }
    }

    /// Appends a due reminder.
    ///
    /// # Errors
    /// - `DueValidationError::MissingCreditor` for a blank creditor.
    /// - `DueValidationError::MissingDate` for a blank date.
    pub fn add_due(&mut self, creditor: &str, contact: Option<&str>, date: &str) -> StoreResult<()> {
        let (creditor, date) = (creditor.trim(), date.trim());
        let missing = if creditor.is_empty() {
            Some(DueValidationError::MissingCreditor)
        } else if date.is_empty() {
            Some(DueValidationError::MissingDate)
        } else {
            None
        };
        if let Some(err) = missing {
            debug!(
                "event=add_due module=store status=rejected namespace={} reason={err:?}",
                self.namespace
            );
            return Err(err.into());
        }

        let due = Due::new(creditor, contact, date);
        self.commit("add_due", |snapshot| snapshot.dues.push(due))
    }

    /// Removes a person together with their transactions and dues.
    ///
    /// Confirmation is the caller's responsibility; the cascade is
    /// unconditional once invoked. Blank or unknown names are ignored.
    pub fn delete_person(&mut self, name: &str) -> StoreResult<MutationOutcome> {
        let name = name.trim();
        if name.is_empty() || !self.contains_person(name) {
            return Ok(self.ignored("delete_person"));
        }

        self.commit("delete_person", |snapshot| {
            snapshot.people.retain(|person| person != name);
            snapshot.transactions.retain(|txn| txn.person != name);
            snapshot.dues.retain(|due| due.creditor != name);
            snapshot.retained.forget_person(name);
        })?;
        Ok(MutationOutcome::Applied)
    }

    fn commit<F>(&mut self, event: &str, mutate: F) -> StoreResult<()>
    where
        F: FnOnce(&mut LedgerSnapshot),
    {
        let previous = self.snapshot.clone();
        mutate(&mut self.snapshot);

        if let Err(err) = save_snapshot(&mut self.repo, &self.namespace, &self.snapshot) {
            self.snapshot = previous;
            error!(
                "event={event} module=store status=error namespace={} error_code=persist_failed error={err}",
                self.namespace
            );
            return Err(err.into());
        }

        info!(
            "event={event} module=store status=ok namespace={} people={} transactions={} dues={}",
            self.namespace,
            self.snapshot.people.len(),
            self.snapshot.transactions.len(),
            self.snapshot.dues.len()
        );
        Ok(())
    }

    fn ignored(&self, event: &str) -> MutationOutcome {
        debug!(
            "event={event} module=store status=ignored namespace={}",
            self.namespace
        );
        MutationOutcome::Ignored
    }
}

fn log_loaded(namespace: &Namespace, snapshot: &LedgerSnapshot) {
    info!(
        "event=select_namespace module=store status=ok namespace={} people={} transactions={} dues={} retained={}",
        namespace,
        snapshot.people.len(),
        snapshot.transactions.len(),
        snapshot.dues.len(),
        snapshot.retained.len()
    );
}
