//! Pricing
//!
//! Pure discount, rounding and currency-formatting helpers. Amounts are
//! [`Decimal`] USD values; every rounding step is two decimal places,
//! midpoint away from zero.

use rust_decimal::{Decimal, RoundingStrategy};

/// Round an amount to two decimal places, midpoint away from zero.
#[must_use]
pub fn round2(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Unit price after a percentage discount, rounded to two decimal places.
///
/// The per-line rounding here happens *before* any subtotal is formed;
/// totals are rounded again at the tax step. Both roundings are part of the
/// price contract.
#[must_use]
pub fn discounted(price: Decimal, percent: u8) -> Decimal {
    let fraction = Decimal::from(percent) / Decimal::ONE_HUNDRED;

    round2(price * (Decimal::ONE - fraction))
}

/// Sales tax on a subtotal, at a flat 10 percent.
#[must_use]
pub fn tax(subtotal: Decimal) -> Decimal {
    round2(subtotal * Decimal::new(10, 2))
}

/// Format an amount as a USD currency string, e.g. `$1,234.56`.
#[must_use]
pub fn format_currency(amount: Decimal) -> String {
    let rounded = round2(amount);
    let magnitude = rounded.abs();
    let text = format!("{magnitude:.2}");
    let (units, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let grouped = group_thousands(units);

    if rounded.is_sign_negative() {
        format!("-${grouped}.{cents}")
    } else {
        format!("${grouped}.{cents}")
    }
}

/// Insert thousands separators into a plain digit string.
fn group_thousands(units: &str) -> String {
    let digits: Vec<char> = units.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (index, digit) in digits.iter().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }

        grouped.push(*digit);
    }

    grouped
}
