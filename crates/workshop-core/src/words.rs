//! # Amount in Words
//!
//! Renders a payable amount as the English phrase printed on quotations and
//! invoices.
//!
//! ```text
//! 1250.00  ──►  "One Thousand Two Hundred Fifty Birr Only"
//! 1250.50  ──►  "One Thousand Two Hundred Fifty Birr And Fifty Cents Only"
//!    0.00  ──►  "Zero Birr Only"
//! ```
//!
//! The whole and fractional parts are converted independently. The function
//! is pure and does no rounding: amounts are already whole cents.

use serde::{Deserialize, Serialize};

use crate::money::Money;

const ONES: [&str; 20] = [
    "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
    "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen",
    "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const SCALES: [&str; 7] = [
    "",
    "Thousand",
    "Million",
    "Billion",
    "Trillion",
    "Quadrillion",
    "Quintillion",
];

/// Currency vocabulary for the rendered phrase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WordsStyle {
    /// Whole-unit currency name ("Birr").
    pub major: String,
    /// Fractional-unit name ("Cents").
    pub minor: String,
    /// Word between the whole and fractional parts ("And").
    pub joiner: String,
    /// Closing word ("Only").
    pub suffix: String,
}

impl Default for WordsStyle {
    fn default() -> Self {
        WordsStyle {
            major: "Birr".to_string(),
            minor: "Cents".to_string(),
            joiner: "And".to_string(),
            suffix: "Only".to_string(),
        }
    }
}

/// Renders `amount` with the given currency words.
///
/// ## Example
/// ```rust
/// use workshop_core::money::Money;
/// use workshop_core::words::{amount_in_words, WordsStyle};
///
/// let words = amount_in_words(Money::from_major(1250), &WordsStyle::default());
/// assert_eq!(words, "One Thousand Two Hundred Fifty Birr Only");
/// ```
pub fn amount_in_words(amount: Money, style: &WordsStyle) -> String {
    let cents = amount.cents().unsigned_abs();
    let whole = cents / 100;
    let fraction = cents % 100;

    let mut parts: Vec<String> = Vec::new();
    if amount.is_negative() {
        parts.push("Minus".to_string());
    }
    parts.push(number_to_words(whole));
    parts.push(style.major.clone());

    if fraction > 0 {
        parts.push(style.joiner.clone());
        parts.push(number_to_words(fraction));
        parts.push(style.minor.clone());
    }

    parts.push(style.suffix.clone());

    parts
        .into_iter()
        .filter(|p| !p.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalized English cardinal for `n`, without "and" inside hundreds.
///
/// ## Example
/// ```rust
/// use workshop_core::words::number_to_words;
///
/// assert_eq!(number_to_words(0), "Zero");
/// assert_eq!(number_to_words(1_000_021), "One Million Twenty One");
/// ```
pub fn number_to_words(n: u64) -> String {
    if n == 0 {
        return ONES[0].to_string();
    }

    let mut groups: Vec<String> = Vec::new();
    let mut rest = n;
    let mut scale = 0;

    while rest > 0 {
        let chunk = (rest % 1000) as usize;
        if chunk > 0 {
            let mut words = chunk_to_words(chunk);
            if !SCALES[scale].is_empty() {
                words.push(' ');
                words.push_str(SCALES[scale]);
            }
            groups.push(words);
        }
        rest /= 1000;
        scale += 1;
    }

    groups.reverse();
    groups.join(" ")
}

/// Words for 1..=999.
fn chunk_to_words(chunk: usize) -> String {
    let mut parts: Vec<&str> = Vec::new();

    let hundreds = chunk / 100;
    let rem = chunk % 100;

    if hundreds > 0 {
        parts.push(ONES[hundreds]);
        parts.push("Hundred");
    }

    if rem >= 20 {
        parts.push(TENS[rem / 10]);
        if rem % 10 > 0 {
            parts.push(ONES[rem % 10]);
        }
    } else if rem > 0 {
        parts.push(ONES[rem]);
    }

    parts.join(" ")
}

// =============================================================================
// Unit Tests
// =============================================================================
