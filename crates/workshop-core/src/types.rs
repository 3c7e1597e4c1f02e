//! # Domain Types
//!
//! Small shared types used throughout the billing engine.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    TaxRate      │   │  CategoryKind   │   │  InvoiceKind    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  bps (u32)      │   │  Labour         │   │  Proforma       │       │
//! │  │  1500 = 15%     │   │  Spare          │   │  Payment        │       │
//! │  └─────────────────┘   │  Other          │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │  DraftStatus    │   │ BillingPolicy   │                              │
//! │  │  ─────────────  │   │  ─────────────  │                              │
//! │  │  Editing        │   │  vat_rate       │                              │
//! │  │  Finalized      │   │  words style    │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::validation::{validate_tax_rate_bps, validate_words_style};
use crate::words::WordsStyle;
use crate::DEFAULT_VAT_RATE;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000
/// 1500 bps = 15% (the flat VAT rate applied to enabled categories)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for convenience).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        DEFAULT_VAT_RATE
    }
}

// =============================================================================
// Category Kind
// =============================================================================

/// The kind of a cost category. A draft holds at most one category per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CategoryKind {
    /// Workshop labour: time × rate.
    Labour,
    /// Spare parts: quantity × unit price.
    Spare,
    /// Flat other costs: a single amount per row.
    Other,
}

impl CategoryKind {
    /// All kinds in display and payload order.
    pub const ALL: [CategoryKind; 3] = [CategoryKind::Labour, CategoryKind::Spare, CategoryKind::Other];

    /// Wire name, matching the payload key prefixes (`labour_items`, `labour_vat`).
    pub const fn as_str(&self) -> &'static str {
        match self {
            CategoryKind::Labour => "labour",
            CategoryKind::Spare => "spare",
            CategoryKind::Other => "other",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Invoice Kind
// =============================================================================

/// Which workflow a draft belongs to.
///
/// Both kinds share one computation and one payload schema; the kind only
/// decides which categories are active and is carried through to finalized
/// snapshots so the surrounding console picks the right endpoint and template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceKind {
    /// Price quotation issued before the sale is finalized.
    Proforma,
    /// Formal payment invoice.
    Payment,
}

impl InvoiceKind {
    /// Categories a new draft of this kind starts with.
    pub fn active_categories(&self) -> &'static [CategoryKind] {
        match self {
            InvoiceKind::Proforma | InvoiceKind::Payment => &CategoryKind::ALL,
        }
    }
}

impl fmt::Display for InvoiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceKind::Proforma => write!(f, "proforma"),
            InvoiceKind::Payment => write!(f, "payment"),
        }
    }
}

impl std::str::FromStr for InvoiceKind {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "proforma" | "quotation" => Ok(InvoiceKind::Proforma),
            "payment" | "invoice" => Ok(InvoiceKind::Payment),
            _ => Err(ValidationError::NotAllowed {
                field: "invoice kind".to_string(),
                allowed: vec!["proforma".to_string(), "payment".to_string()],
            }),
        }
    }
}

// =============================================================================
// Draft Status
// =============================================================================

/// The state of an invoice draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DraftStatus {
    /// Rows and adjustments may change; every change recomputes the summary.
    #[default]
    Editing,
    /// Frozen snapshot handed to persistence at submit time.
    Finalized,
}

// =============================================================================
// Billing Policy
// =============================================================================

/// The engine's configurable constants: the flat VAT rate and the words used
/// when rendering amounts.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BillingPolicy {
    pub vat_rate: TaxRate,
    pub words: WordsStyle,
}

impl BillingPolicy {
    /// Checks the rate bounds and that the currency words are present.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_tax_rate_bps(self.vat_rate.bps())?;
        validate_words_style(&self.words)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
