//! Per-person totals.

use crate::model::ledger::{Transaction, TransactionKind};
use rust_decimal::Decimal;

/// Credit and payment totals for one person.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersonTotals {
    pub credit: Decimal,
    pub payment: Decimal,
}

impl PersonTotals {
    /// Signed balance: credits minus payments.
    pub fn balance(&self) -> Decimal {
        self.credit.saturating_sub(self.payment)
    }

    /// Totals after recording `amount` of `kind`, or `None` on overflow.
    pub fn checked_add(self, kind: TransactionKind, amount: Decimal) -> Option<Self> {
        let mut next = self;
        match kind {
            TransactionKind::Credit => next.credit = self.credit.checked_add(amount)?,
            TransactionKind::Payment => next.payment = self.payment.checked_add(amount)?,
        }
        Some(next)
    }

    fn saturating_add(self, kind: TransactionKind, amount: Decimal) -> Self {
        let mut next = self;
        match kind {
            TransactionKind::Credit => next.credit = self.credit.saturating_add(amount),
            TransactionKind::Payment => next.payment = self.payment.saturating_add(amount),
        }
        next
    }
}

/// Sums credits and payments for `person` (exact name match).
///
/// Each total saturates at `Decimal::MAX`. A `LedgerStore` never holds
/// transactions that reach the cap.
pub fn totals_for(person: &str, transactions: &[Transaction]) -> PersonTotals {
    transactions
        .iter()
        .filter(|txn| txn.person == person)
        .fold(PersonTotals::default(), |totals, txn| {
            totals.saturating_add(txn.kind, txn.amount)
        })
}

/// Balance of `person`: sum of credits minus sum of payments.
///
/// Decimal addition is exact, so the result does not depend on the order
/// of `transactions`.
pub fn balance_of(person: &str, transactions: &[Transaction]) -> Decimal {
    totals_for(person, transactions).balance()
}
