//! # Error Types
//!
//! Domain-specific error types for workshop-core.
//!
//! ## What Is (and Is Not) an Error
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Fault Handling in the Engine                         │
//! │                                                                         │
//! │  Non-numeric field value ("abc")   ──► coerced to 0, NOT an error       │
//! │  Discount larger than the total    ──► gross total clamped to 0         │
//! │  Missing invoice date / customer   ──► surrounding form's concern       │
//! │                                                                         │
//! │  Row index past the end            ──► CoreError::RowOutOfRange         │
//! │  "brand" on a labour row           ──► CoreError::FieldNotApplicable    │
//! │  Edit after submit                 ──► CoreError::DraftFinalized        │
//! │  Payload is not a JSON object      ──► CoreError::InvalidPayload        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Errors here signal API misuse by the caller, never bad numbers typed by a
//! user.

use thiserror::Error;

use crate::line_item::LineField;
use crate::types::CategoryKind;

// =============================================================================
// Core Error
// =============================================================================

/// Errors raised by draft editing and payload handling.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Update or removal addressed a row that does not exist.
    #[error("Row {index} is out of range for {kind} items (len {len})")]
    RowOutOfRange {
        kind: CategoryKind,
        index: usize,
        len: usize,
    },

    /// The field does not belong to this category's row shape.
    #[error("Field '{field}' does not apply to {kind} items")]
    FieldNotApplicable { kind: CategoryKind, field: LineField },

    /// The field name is not part of the line-item vocabulary.
    #[error("Unknown line item field: {0}")]
    UnknownField(String),

    /// The category is not active for this draft.
    #[error("Category {0} is not active on this draft")]
    CategoryInactive(CategoryKind),

    /// The draft was finalized and can no longer change.
    #[error("Draft is finalized and cannot be edited")]
    DraftFinalized,

    /// The persisted payload is structurally unusable.
    #[error("Invalid payload: {0}")]
    InvalidPayload(#[from] serde_json::Error),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Configuration and parameter validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required value is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
