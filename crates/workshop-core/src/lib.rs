//! # workshop-core: Pure Billing Engine for the Workshop Console
//!
//! This crate computes every figure shown on a Proforma quotation or a
//! Payment invoice for a vehicle repair job. It holds no I/O: the form layer
//! feeds it edits, and it hands back totals and a payload to persist.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Workshop Console Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Forms (Proforma / Payment)                   │   │
//! │  │    Row tables ──► VAT checkboxes ──► Discount ──► Submit         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ edits                                  │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 workshop-session (registry, config)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ workshop-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ line_item │  │ category  │  │  summary  │  │   words   │  │   │
//! │  │   │  Labour   │  │ subtotal  │  │  gross    │  │ "Eight    │  │   │
//! │  │   │  Spare    │  │ VAT flag  │  │  net pay  │  │  Hundred" │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   engine::Draft ──► payload::PersistablePayload                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer Money and Quantity, VAT math
//! - [`coerce`] - Lenient text-to-number conversion
//! - [`line_item`] - Labour, spare and other-cost rows
//! - [`category`] - Row lists with a VAT toggle
//! - [`summary`] - Combined totals, discount, gross and net pay
//! - [`words`] - Amount in words
//! - [`payload`] - The persisted JSON record
//! - [`engine`] - The `Draft` facade
//! - [`types`], [`error`], [`validation`]
//!
//! ## Example Usage
//!
//! ```rust
//! use workshop_core::{BillingPolicy, CategoryKind, Draft, InvoiceKind, LineField, Money};
//!
//! let mut draft = Draft::new(InvoiceKind::Proforma, BillingPolicy::default());
//!
//! let row = draft.add_row(CategoryKind::Spare).unwrap();
//! draft.update_field(CategoryKind::Spare, row, LineField::Quantity, "3").unwrap();
//! draft.update_field(CategoryKind::Spare, row, LineField::UnitPrice, "150").unwrap();
//! draft.set_discount_input("50").unwrap();
//!
//! assert_eq!(draft.summary().gross_total, Money::from_major(400));
//! assert_eq!(draft.summary().net_pay_words, "Four Hundred Birr Only");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod category;
pub mod coerce;
pub mod engine;
pub mod error;
pub mod line_item;
pub mod money;
pub mod payload;
pub mod summary;
pub mod types;
pub mod validation;
pub mod words;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use category::{Category, CategoryTotals};
pub use engine::{Draft, FinalizedInvoice, RowOp};
pub use error::{CoreError, CoreResult, ValidationError};
pub use line_item::{LabourItem, LineField, LineItem, OtherItem, SpareItem};
pub use money::{Money, Quantity};
pub use payload::{PayloadSummary, PersistablePayload};
pub use summary::{aggregate, Summary};
pub use types::*;
pub use words::{amount_in_words, WordsStyle};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// The flat VAT rate applied to every category with VAT enabled.
pub const DEFAULT_VAT_RATE: TaxRate = TaxRate::from_bps(1500);

/// Decimal places kept for monetary amounts (cents).
pub const MONEY_SCALE: u32 = 2;

/// Decimal places kept for quantities and hours (thousandths).
pub const QUANTITY_SCALE: u32 = 3;
