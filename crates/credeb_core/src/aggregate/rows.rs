//! Summary, history and dues views.

use crate::aggregate::balance::totals_for;
use crate::model::ledger::{Due, Transaction};
use rust_decimal::Decimal;
use std::slice;

/// One line of the per-person summary table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub person: String,
    pub total_credit: Decimal,
    pub total_payment: Decimal,
    /// `total_credit - total_payment`; negative when payments exceed credits.
    pub balance: Decimal,
}

/// Lazy summary sequence in people insertion order.
///
/// Cloning the iterator restarts it from the current position, so a fresh
/// clone taken before iteration replays the full sequence.
#[derive(Debug, Clone)]
pub struct SummaryRows<'a> {
    people: slice::Iter<'a, String>,
    transactions: &'a [Transaction],
    needle: String,
}

impl Iterator for SummaryRows<'_> {
    type Item = SummaryRow;

    fn next(&mut self) -> Option<Self::Item> {
        let needle = self.needle.as_str();
        let person = self
            .people
            .by_ref()
            .find(|name| needle.is_empty() || name.to_lowercase().contains(needle))?;

        let totals = totals_for(person, self.transactions);
        Some(SummaryRow {
            person: person.clone(),
            total_credit: totals.credit,
            total_payment: totals.payment,
            balance: totals.balance(),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.people.size_hint().1)
    }
}

/// Summary rows for every person whose name contains `filter`
/// (case-insensitive). `None` or an empty filter selects everybody.
pub fn summary_rows<'a>(
    people: &'a [String],
    transactions: &'a [Transaction],
    filter: Option<&str>,
) -> SummaryRows<'a> {
    SummaryRows {
        people: people.iter(),
        transactions,
        needle: filter.unwrap_or_default().to_lowercase(),
    }
}

/// Transactions in insertion order, optionally restricted to one person.
pub fn history_rows<'a>(
    transactions: &'a [Transaction],
    person: Option<&'a str>,
) -> impl Iterator<Item = Transaction> + Clone + 'a {
    transactions
        .iter()
        .filter(move |txn| person.map_or(true, |name| txn.person == name))
        .cloned()
}

/// Dues in insertion order.
pub fn dues_rows(dues: &[Due]) -> impl Iterator<Item = Due> + Clone + '_ {
    dues.iter().cloned()
}

/// `(person, balance)` pairs in people order; the data behind a balance chart.
pub fn balance_series(people: &[String], transactions: &[Transaction]) -> Vec<(String, Decimal)> {
    summary_rows(people, transactions, None)
        .map(|row| (row.person, row.balance))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{balance_series, history_rows, summary_rows};
    use crate::model::ledger::{Transaction, TransactionKind};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn summary_filter_is_case_insensitive_and_keeps_order() {
        let people = names(&["Alice", "Bob", "Cal"]);
        let rows: Vec<_> = summary_rows(&people, &[], Some("AL"))
            .map(|row| row.person)
            .collect();
        assert_eq!(rows, vec!["Alice", "Cal"]);
    }

    #[test]
    fn summary_iterator_is_restartable_via_clone() {
        let people = names(&["Alice", "Bob"]);
        let txns = vec![Transaction::new("Bob", "d", dec!(5), TransactionKind::Payment)];
        let rows = summary_rows(&people, &txns, None);

        let first: Vec<_> = rows.clone().collect();
        let second: Vec<_> = rows.collect();
        assert_eq!(first, second);
        assert_eq!(first[1].balance, dec!(-5));
    }

    #[test]
    fn history_filters_by_exact_person() {
        let txns = vec![
            Transaction::new("Alice", "d1", dec!(1), TransactionKind::Credit),
            Transaction::new("Bob", "d2", dec!(2), TransactionKind::Credit),
            Transaction::new("Alice", "d3", dec!(3), TransactionKind::Payment),
        ];
        let dates: Vec<_> = history_rows(&txns, Some("Alice")).map(|t| t.date).collect();
        assert_eq!(dates, vec!["d1", "d3"]);
        assert_eq!(history_rows(&txns, None).count(), 3);
    }

    #[test]
    fn balance_series_covers_people_without_transactions() {
        let people = names(&["Alice", "Bob"]);
        let txns = vec![Transaction::new("Alice", "d", dec!(9), TransactionKind::Credit)];
        assert_eq!(
            balance_series(&people, &txns),
            vec![("Alice".to_string(), dec!(9)), ("Bob".to_string(), dec!(0))]
        );
    }

    #[test]
    fn summary_survives_totals_beyond_decimal_range() {
        let people = names(&["A"]);
        let huge = dec!(50000000000000000000000000000);
        let txns = vec![
            Transaction::new("A", "d1", huge, TransactionKind::Credit),
            Transaction::new("A", "d2", huge, TransactionKind::Credit),
        ];

        let rows: Vec<_> = summary_rows(&people, &txns, None).collect();
        assert_eq!(rows[0].total_credit, Decimal::MAX);
        assert_eq!(rows[0].balance, Decimal::MAX);
        assert_eq!(balance_series(&people, &txns)[0].1, Decimal::MAX);
    }
}
