//! # Validation Module
//!
//! Checks for the engine's configurable constants.
//!
//! Line-item input is never validated here: numeric fields are coerced (see
//! [`crate::coerce`]) and required invoice fields belong to the surrounding
//! form. What is validated is the policy a draft is opened with, so a bad
//! config file fails loudly at startup instead of skewing every total.
//!
//! ## Usage
//! ```rust
//! use workshop_core::validation::validate_tax_rate_bps;
//!
//! assert!(validate_tax_rate_bps(1500).is_ok());
//! assert!(validate_tax_rate_bps(10_001).is_err());
//! ```

use crate::error::ValidationError;
use crate::words::WordsStyle;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a tax rate in basis points.
///
/// ## Rules
/// - Must be between 0 and 10000 (0% to 100%)
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10_000 {
        return Err(ValidationError::OutOfRange {
            field: "vat_rate_bps".to_string(),
            min: 0,
            max: 10_000,
        });
    }

    Ok(())
}

/// Validates the words used by the amount-in-words renderer.
///
/// ## Rules
/// - Currency major and minor names must not be blank
/// - Joiner and suffix may be blank (renders without them)
pub fn validate_words_style(style: &WordsStyle) -> ValidationResult<()> {
    if style.major.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "currency major name".to_string(),
        });
    }

    if style.minor.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "currency minor name".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
