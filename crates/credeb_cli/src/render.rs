//! Plain-text tables and charts for terminal output.

use credeb_core::{format_amount, Due, SummaryRow, Transaction};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

const CHART_WIDTH: u32 = 40;

pub fn summary_table(rows: impl Iterator<Item = SummaryRow>, currency: &str) -> String {
    let body: Vec<[String; 4]> = rows
        .map(|row| {
            [
                row.person,
                format_amount(row.total_credit, currency),
                format_amount(row.total_payment, currency),
                format_amount(row.balance, currency),
            ]
        })
        .collect();
    table(["Name", "Credit", "Payment", "Balance"], &body)
}

pub fn history_table(rows: impl Iterator<Item = Transaction>, currency: &str) -> String {
    let body: Vec<[String; 4]> = rows
        .map(|txn| {
            [
                txn.date,
                txn.person,
                txn.kind.label().to_string(),
                format_amount(txn.amount, currency),
            ]
        })
        .collect();
    table(["Date", "Name", "Type", "Amount"], &body)
}

pub fn dues_table(rows: impl Iterator<Item = Due>) -> String {
    let body: Vec<[String; 3]> = rows
        .map(|due| {
            [
                due.creditor,
                due.contact.unwrap_or_else(|| "-".to_string()),
                due.date,
            ]
        })
        .collect();
    table(["Creditor", "Contact", "Due Date"], &body)
}

/// Horizontal bars scaled to the largest absolute balance.
///
/// Positive balances draw `#`, negative balances draw `-`.
pub fn balance_chart(series: &[(String, Decimal)], currency: &str) -> String {
    let max = series
        .iter()
        .map(|(_, balance)| balance.abs())
        .max()
        .unwrap_or(Decimal::ZERO);
    let label_width = series
        .iter()
        .map(|(name, _)| name.chars().count())
        .max()
        .unwrap_or(0);

    series
        .iter()
        .map(|(name, balance)| {
            let length = bar_length(*balance, max);
            let glyph = if balance.is_sign_negative() { "-" } else { "#" };
            format!(
                "{name:<label_width$} | {} {}\n",
                glyph.repeat(length),
                format_amount(*balance, currency)
            )
        })
        .collect()
}

fn bar_length(balance: Decimal, max: Decimal) -> usize {
    if max.is_zero() {
        return 0;
    }
    (balance.abs() / max * Decimal::from(CHART_WIDTH))
        .round()
        .to_usize()
        .unwrap_or(0)
}

fn table<const N: usize>(header: [&str; N], rows: &[[String; N]]) -> String {
    let mut widths = header.map(|title| title.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = render_line(header.iter().copied(), &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    out.push_str(&render_line(rule.iter().map(String::as_str), &widths));
    for row in rows {
        out.push_str(&render_line(row.iter().map(String::as_str), &widths));
    }
    out
}

fn render_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    format!("{}\n", line.join("  ").trim_end())
}
