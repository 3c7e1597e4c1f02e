//! # Numeric Coercion
//!
//! The single place where raw form input becomes a number.
//!
//! ## Leniency Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Raw field text               Parsed (scale 2)                          │
//! │  ──────────────               ────────────────                          │
//! │  "150"                  ───►  15000                                     │
//! │  " 1,250.50 "           ───►  125050                                    │
//! │  "-12.5"                ───►  -1250    (negative kept as-is)            │
//! │  "0.005"                ───►  1        (half away from zero)            │
//! │  ""                     ───►  0                                         │
//! │  "abc" / "1.2.3" / "NaN"───►  0        (never an error)                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every numeric line-item field, the discount and the other-cost adjustment
//! go through [`to_number_or_zero`] (or [`json_to_number_or_zero`] when a
//! persisted record is re-seeded), so the "malformed input is zero" rule holds
//! everywhere.

use serde_json::Value;

/// Parses `raw` into an integer scaled by `10^scale`, or `0` if it is not a
/// plain decimal literal.
///
/// ## Example
/// ```rust
/// use workshop_core::coerce::to_number_or_zero;
///
/// assert_eq!(to_number_or_zero("12.34", 2), 1234);
/// assert_eq!(to_number_or_zero("2", 3), 2000);
/// assert_eq!(to_number_or_zero("twelve", 2), 0);
/// ```
pub fn to_number_or_zero(raw: &str, scale: u32) -> i64 {
    parse_scaled(raw, scale).unwrap_or(0)
}

/// Same as [`to_number_or_zero`] but for a persisted JSON value.
///
/// Numbers and numeric strings are accepted; `null`, booleans, arrays and
/// objects are zero.
pub fn json_to_number_or_zero(value: &Value, scale: u32) -> i64 {
    match value {
        Value::String(s) => to_number_or_zero(s, scale),
        Value::Number(n) => parse_scaled(&n.to_string(), scale)
            .or_else(|| n.as_f64().and_then(|f| scale_float(f, scale)))
            .unwrap_or(0),
        _ => 0,
    }
}

fn parse_scaled(raw: &str, scale: u32) -> Option<i64> {
    let s = raw.trim();
    let (negative, body) = match s.as_bytes().first()? {
        b'-' => (true, &s[1..]),
        b'+' => (false, &s[1..]),
        _ => (false, s),
    };

    let (whole, frac) = body.split_once('.').unwrap_or((body, ""));
    let whole: String = whole.chars().filter(|c| *c != ',').collect();

    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(&whole) || !all_digits(frac) || whole.len() + frac.len() == 0 {
        return None;
    }

    let mut value: i128 = 0;
    for digit in whole.bytes() {
        value = value.checked_mul(10)?.checked_add(i128::from(digit - b'0'))?;
    }

    let frac = frac.as_bytes();
    for i in 0..scale as usize {
        let digit = frac.get(i).map_or(0, |b| b - b'0');
        value = value.checked_mul(10)?.checked_add(i128::from(digit))?;
    }

    // Half away from zero on the first dropped digit
    if frac.get(scale as usize).is_some_and(|b| *b >= b'5') {
        value = value.checked_add(1)?;
    }

    if negative {
        value = -value;
    }

    i64::try_from(value).ok()
}

fn scale_float(f: f64, scale: u32) -> Option<i64> {
    if !f.is_finite() {
        return None;
    }
    let scaled = (f * 10f64.powi(scale as i32)).round();
    if scaled >= i64::MIN as f64 && scaled <= i64::MAX as f64 {
        Some(scaled as i64)
    } else {
        None
    }
}

/// Divides `numerator` by a positive `denominator`, rounding half away from
/// zero, saturating at the `i64` bounds.
pub(crate) fn div_round_half_away(numerator: i128, denominator: i128) -> i64 {
    let half = denominator / 2;
    let rounded = if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    };
    i64::try_from(rounded).unwrap_or(if rounded > 0 { i64::MAX } else { i64::MIN })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_numbers() {
        assert_eq!(to_number_or_zero("150", 2), 15000);
        assert_eq!(to_number_or_zero("150.5", 2), 15050);
        assert_eq!(to_number_or_zero("0.75", 3), 750);
        assert_eq!(to_number_or_zero("+3", 0), 3);
    }

    #[test]
    fn test_whitespace_and_separators() {
        assert_eq!(to_number_or_zero("  42  ", 2), 4200);
        assert_eq!(to_number_or_zero("1,250.50", 2), 125050);
    }

    #[test]
    fn test_partial_literals() {
        assert_eq!(to_number_or_zero("5.", 2), 500);
        assert_eq!(to_number_or_zero(".5", 2), 50);
    }

    #[test]
    fn test_negative_kept() {
        assert_eq!(to_number_or_zero("-12.5", 2), -1250);
        assert_eq!(to_number_or_zero("-0.005", 2), -1);
    }

    #[test]
    fn test_rounding_extra_digits() {
        assert_eq!(to_number_or_zero("0.005", 2), 1);
        assert_eq!(to_number_or_zero("0.004", 2), 0);
        assert_eq!(to_number_or_zero("1.2345", 3), 1235);
    }

    #[test]
    fn test_garbage_is_zero() {
        for raw in ["", "   ", "abc", "12abc", "1.2.3", "NaN", "Infinity", "1e3", "-", ".", "--1"] {
            assert_eq!(to_number_or_zero(raw, 2), 0, "input {:?}", raw);
        }
    }

    #[test]
    fn test_overflow_is_zero() {
        assert_eq!(to_number_or_zero("99999999999999999999999", 2), 0);
    }

    #[test]
    fn test_json_values() {
        assert_eq!(json_to_number_or_zero(&json!(400), 2), 40000);
        assert_eq!(json_to_number_or_zero(&json!(12.5), 3), 12500);
        assert_eq!(json_to_number_or_zero(&json!("60.25"), 2), 6025);
        assert_eq!(json_to_number_or_zero(&json!(null), 2), 0);
        assert_eq!(json_to_number_or_zero(&json!(true), 2), 0);
        assert_eq!(json_to_number_or_zero(&json!([1]), 2), 0);
        assert_eq!(json_to_number_or_zero(&json!("n/a"), 2), 0);
    }

    #[test]
    fn test_div_round_half_away() {
        assert_eq!(div_round_half_away(1500, 1000), 2);
        assert_eq!(div_round_half_away(1499, 1000), 1);
        assert_eq!(div_round_half_away(-1500, 1000), -2);
        assert_eq!(div_round_half_away(-1499, 1000), -1);
    }
}
