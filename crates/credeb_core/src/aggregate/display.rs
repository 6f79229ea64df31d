//! Display-sign policy for balances.
//!
//! Non-negative amounts render as `<symbol><amount>`; negative amounts
//! render as `-<symbol><abs amount>`.

use rust_decimal::Decimal;

/// Formats `amount` with a currency `symbol`, e.g. `₹60` or `-₹40`.
pub fn format_amount(amount: Decimal, symbol: &str) -> String {
    let magnitude = plain_amount(amount.abs());
    if amount.is_sign_negative() && !amount.is_zero() {
        format!("-{symbol}{magnitude}")
    } else {
        format!("{symbol}{magnitude}")
    }
}

/// Plain decimal text without trailing fractional zeros (`12.50` -> `12.5`).
pub fn plain_amount(amount: Decimal) -> String {
    amount.normalize().to_string()
}
