//! # Categories
//!
//! An ordered list of rows of one kind plus its VAT toggle, and the reduction
//! of that list to a subtotal and VAT amount.
//!
//! ## Row Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Form Action              Category Operation         Effect            │
//! │  ───────────              ──────────────────         ──────            │
//! │  "+ Add row" ───────────► add_row()          ──────► items.push(blank) │
//! │  Type in a cell ────────► update_field(i, f) ──────► items[i].f = v    │
//! │  Trash icon ────────────► remove_row(i)      ──────► items.remove(i)   │
//! │  VAT checkbox ──────────► toggle_vat()       ──────► vat_enabled = !v  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Indices are positions, not identities: after `remove_row(0)` the former
//! row 1 is row 0.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::line_item::{LineField, LineItem};
use crate::money::Money;
use crate::payload::wire;
use crate::types::{CategoryKind, TaxRate};

/// A single cost category of a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    kind: CategoryKind,
    items: Vec<LineItem>,
    vat_enabled: bool,
}

impl Category {
    /// An empty category with VAT off.
    pub fn new(kind: CategoryKind) -> Self {
        Category {
            kind,
            items: Vec::new(),
            vat_enabled: false,
        }
    }

    /// Builds a category from rows, dropping any row of a different kind.
    pub fn from_items(kind: CategoryKind, items: Vec<LineItem>, vat_enabled: bool) -> Self {
        Category {
            kind,
            items: items.into_iter().filter(|i| i.kind() == kind).collect(),
            vat_enabled,
        }
    }

    pub fn kind(&self) -> CategoryKind {
        self.kind
    }

    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn vat_enabled(&self) -> bool {
        self.vat_enabled
    }

    /// Appends a zero-valued row and returns its index.
    pub fn add_row(&mut self) -> usize {
        self.items.push(LineItem::blank(self.kind));
        self.items.len() - 1
    }

    /// Writes a field of row `index` from raw form text.
    pub fn update_field(&mut self, index: usize, field: LineField, raw: &str) -> CoreResult<()> {
        let len = self.items.len();
        let kind = self.kind;
        self.items
            .get_mut(index)
            .ok_or(CoreError::RowOutOfRange { kind, index, len })?
            .set_field(field, raw)
    }

    /// Removes row `index`, returning it.
    pub fn remove_row(&mut self, index: usize) -> CoreResult<LineItem> {
        if index >= self.items.len() {
            return Err(CoreError::RowOutOfRange {
                kind: self.kind,
                index,
                len: self.items.len(),
            });
        }
        Ok(self.items.remove(index))
    }

    pub fn set_vat(&mut self, enabled: bool) {
        self.vat_enabled = enabled;
    }

    /// Flips the VAT flag and returns the new value.
    pub fn toggle_vat(&mut self) -> bool {
        self.vat_enabled = !self.vat_enabled;
        self.vat_enabled
    }

    /// Σ row totals. Zeroed rows simply contribute nothing.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::total).sum()
    }

    /// VAT for this category: `tax(subtotal)` when enabled, else zero.
    pub fn vat(&self, rate: TaxRate) -> Money {
        if self.vat_enabled {
            self.subtotal().calculate_tax(rate)
        } else {
            Money::zero()
        }
    }

    /// Reduces the category to its subtotal and VAT.
    pub fn totals(&self, rate: TaxRate) -> CategoryTotals {
        CategoryTotals {
            kind: self.kind,
            subtotal: self.subtotal(),
            vat: self.vat(rate),
        }
    }
}

/// The aggregate of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotals {
    pub kind: CategoryKind,
    #[serde(serialize_with = "wire::ser_money", deserialize_with = "wire::de_money")]
    #[ts(type = "number")]
    pub subtotal: Money,
    #[serde(serialize_with = "wire::ser_money", deserialize_with = "wire::de_money")]
    #[ts(type = "number")]
    pub vat: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
