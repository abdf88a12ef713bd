//! Display formatting for metric values.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds half away from zero and pads to exactly `dp` decimal places.
#[must_use]
pub fn fixed(value: Decimal, dp: u32) -> String {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    rounded.to_string()
}

/// Groups the integer part with commas and keeps up to `max_dp` significant
/// decimals (`4500` → `"4,500"`, `1234.5` → `"1,234.5"`).
#[must_use]
pub fn grouped(value: Decimal, max_dp: u32) -> String {
    let rounded = value
        .round_dp_with_strategy(max_dp, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut out = String::with_capacity(text.len() + text.len() / 3 + 1);
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    let digits = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (digits - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// `value` as a `%`-suffixed two-decimal string, or `n/a` when absent.
#[must_use]
pub fn percent_or_na(value: Option<Decimal>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{}%", fixed(v, 2)))
}
