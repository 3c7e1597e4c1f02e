//! # Draft Engine
//!
//! The facade the console's Proforma and Payment screens drive.
//!
//! ## Draft Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Draft Lifecycle                                 │
//! │                                                                         │
//! │   Draft::new / Draft::from_payload                                      │
//! │          │                                                              │
//! │          ▼                                                              │
//! │   ┌──────────────┐  apply_edit / set_discount / toggle_vat ...          │
//! │   │   Editing    │◄──────────────┐                                      │
//! │   │              │───────────────┘  (summary recomputed every time)     │
//! │   └──────┬───────┘                                                      │
//! │          │ finalize()                                                   │
//! │          ▼                                                              │
//! │   ┌──────────────┐                                                      │
//! │   │  Finalized   │──► FinalizedInvoice ──► persistence / print (extern) │
//! │   │  (frozen)    │    every further mutation → DraftFinalized           │
//! │   └──────────────┘                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every mutation is synchronous: when it returns, [`Draft::summary`] already
//! reflects it. Two edits applied in order are observed in that order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::category::Category;
use crate::error::{CoreError, CoreResult};
use crate::line_item::{LineField, LineItem};
use crate::money::Money;
use crate::payload::{PayloadSummary, PersistablePayload};
use crate::summary::{aggregate, Summary};
use crate::types::{BillingPolicy, CategoryKind, DraftStatus, InvoiceKind};

// =============================================================================
// Row Operation
// =============================================================================

/// One structural edit of a category, as sent by the form layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RowOp {
    /// Append a zero-valued row.
    Add,
    /// Write one field of a row from raw input text.
    Update {
        index: usize,
        field: LineField,
        value: String,
    },
    /// Delete a row by position.
    Remove { index: usize },
}

// =============================================================================
// Draft
// =============================================================================

/// An invoice or quotation being edited.
#[derive(Debug, Clone)]
pub struct Draft {
    id: Uuid,
    kind: InvoiceKind,
    created_at: DateTime<Utc>,
    status: DraftStatus,
    categories: Vec<Category>,
    discount: Money,
    other_cost: Money,
    policy: BillingPolicy,
    summary: Summary,
}

impl Draft {
    /// Opens an empty draft with the categories of `kind`.
    ///
    /// ## Example
    /// ```rust
    /// use workshop_core::engine::{Draft, RowOp};
    /// use workshop_core::line_item::LineField;
    /// use workshop_core::money::Money;
    /// use workshop_core::types::{BillingPolicy, CategoryKind, InvoiceKind};
    ///
    /// let mut draft = Draft::new(InvoiceKind::Proforma, BillingPolicy::default());
    /// let row = draft.add_row(CategoryKind::Labour).unwrap();
    /// draft.update_field(CategoryKind::Labour, row, LineField::UnitCost, "200").unwrap();
    /// draft.update_field(CategoryKind::Labour, row, LineField::EstimatedTime, "2").unwrap();
    /// draft.toggle_vat(CategoryKind::Labour).unwrap();
    ///
    /// assert_eq!(draft.summary().gross_total, Money::from_major(460));
    /// ```
    pub fn new(kind: InvoiceKind, policy: BillingPolicy) -> Self {
        Self::with_categories(kind, kind.active_categories(), policy)
    }

    /// Opens an empty draft with an explicit category set.
    ///
    /// Duplicates are ignored; categories are kept in canonical order.
    pub fn with_categories(kind: InvoiceKind, kinds: &[CategoryKind], policy: BillingPolicy) -> Self {
        let categories = CategoryKind::ALL
            .iter()
            .filter(|k| kinds.contains(k))
            .map(|k| Category::new(*k))
            .collect();

        let mut draft = Draft {
            id: Uuid::new_v4(),
            kind,
            created_at: Utc::now(),
            status: DraftStatus::Editing,
            categories,
            discount: Money::zero(),
            other_cost: Money::zero(),
            summary: Summary::empty(&policy),
            policy,
        };
        draft.recompute();
        draft
    }

    /// Re-seeds a draft from a stored record.
    ///
    /// Everything derived (row totals, the summary block) is rebuilt from the
    /// inputs; the stored values are not trusted. Rows for categories that
    /// `kind` does not use are dropped.
    pub fn from_payload(kind: InvoiceKind, payload: &PersistablePayload, policy: BillingPolicy) -> Self {
        Self::new(kind, policy).seeded(payload)
    }

    /// Replaces the rows, VAT flags and adjustments of this draft with those
    /// of `payload`, keeping its id and category set.
    pub fn seeded(mut self, payload: &PersistablePayload) -> Self {
        for category in &mut self.categories {
            let (items, vat): (Vec<LineItem>, bool) = match category.kind() {
                CategoryKind::Labour => (
                    payload.labour_items.iter().cloned().map(LineItem::Labour).collect(),
                    payload.labour_vat,
                ),
                CategoryKind::Spare => (
                    payload.spare_items.iter().cloned().map(LineItem::Spare).collect(),
                    payload.spare_vat,
                ),
                CategoryKind::Other => (
                    payload.other_costs.iter().cloned().map(LineItem::Other).collect(),
                    payload.other_vat,
                ),
            };
            *category = Category::from_items(category.kind(), items, vat);
        }

        self.discount = payload.discount;
        self.other_cost = payload.other_cost;
        self.recompute();
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> InvoiceKind {
        self.kind
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn status(&self) -> DraftStatus {
        self.status
    }

    pub fn is_finalized(&self) -> bool {
        self.status == DraftStatus::Finalized
    }

    pub fn policy(&self) -> &BillingPolicy {
        &self.policy
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, kind: CategoryKind) -> Option<&Category> {
        self.categories.iter().find(|c| c.kind() == kind)
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn other_cost(&self) -> Money {
        self.other_cost
    }

    /// The current totals. Always up to date with the last mutation.
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Applies one row operation to a category and recomputes.
    pub fn apply_edit(&mut self, kind: CategoryKind, op: RowOp) -> CoreResult<&Summary> {
        match op {
            RowOp::Add => {
                self.add_row(kind)?;
            }
            RowOp::Update { index, field, value } => {
                self.update_field(kind, index, field, &value)?;
            }
            RowOp::Remove { index } => {
                self.remove_row(kind, index)?;
            }
        }
        Ok(&self.summary)
    }

    /// Appends a zero-valued row, returning its index.
    pub fn add_row(&mut self, kind: CategoryKind) -> CoreResult<usize> {
        let index = self.category_mut(kind)?.add_row();
        self.recompute();
        Ok(index)
    }

    /// Writes one field of a row from raw input. Non-numeric text in a
    /// numeric field is stored as zero.
    pub fn update_field(
        &mut self,
        kind: CategoryKind,
        index: usize,
        field: LineField,
        raw: &str,
    ) -> CoreResult<&Summary> {
        self.category_mut(kind)?.update_field(index, field, raw)?;
        self.recompute();
        Ok(&self.summary)
    }

    /// Removes a row by position, returning it.
    pub fn remove_row(&mut self, kind: CategoryKind, index: usize) -> CoreResult<LineItem> {
        let removed = self.category_mut(kind)?.remove_row(index)?;
        self.recompute();
        Ok(removed)
    }

    /// Flips a category's VAT flag, returning the new value.
    pub fn toggle_vat(&mut self, kind: CategoryKind) -> CoreResult<bool> {
        let enabled = self.category_mut(kind)?.toggle_vat();
        self.recompute();
        Ok(enabled)
    }

    pub fn set_vat(&mut self, kind: CategoryKind, enabled: bool) -> CoreResult<&Summary> {
        self.category_mut(kind)?.set_vat(enabled);
        self.recompute();
        Ok(&self.summary)
    }

    pub fn set_discount(&mut self, discount: Money) -> CoreResult<&Summary> {
        self.ensure_editing()?;
        self.discount = discount;
        self.recompute();
        Ok(&self.summary)
    }

    /// Sets the discount from raw form text.
    pub fn set_discount_input(&mut self, raw: &str) -> CoreResult<&Summary> {
        self.set_discount(Money::parse_lenient(raw))
    }

    pub fn set_other_cost(&mut self, other_cost: Money) -> CoreResult<&Summary> {
        self.ensure_editing()?;
        self.other_cost = other_cost;
        self.recompute();
        Ok(&self.summary)
    }

    /// Sets the flat other-cost adjustment from raw form text.
    pub fn set_other_cost_input(&mut self, raw: &str) -> CoreResult<&Summary> {
        self.set_other_cost(Money::parse_lenient(raw))
    }

    // =========================================================================
    // Output
    // =========================================================================

    /// Builds the persisted record. Categories not active on this draft are
    /// emitted as empty lists with VAT off.
    pub fn serialize(&self) -> PersistablePayload {
        let mut payload = PersistablePayload {
            discount: self.discount,
            other_cost: self.other_cost,
            summary: PayloadSummary::from(&self.summary),
            ..PersistablePayload::default()
        };

        for category in &self.categories {
            match category.kind() {
                CategoryKind::Labour => payload.labour_vat = category.vat_enabled(),
                CategoryKind::Spare => payload.spare_vat = category.vat_enabled(),
                CategoryKind::Other => payload.other_vat = category.vat_enabled(),
            }
            for item in category.items() {
                match item {
                    LineItem::Labour(row) => payload.labour_items.push(row.clone()),
                    LineItem::Spare(row) => payload.spare_items.push(row.clone()),
                    LineItem::Other(row) => payload.other_costs.push(row.clone()),
                }
            }
        }

        payload
    }

    /// Freezes the draft and returns the snapshot to hand to persistence.
    pub fn finalize(&mut self) -> CoreResult<FinalizedInvoice> {
        self.ensure_editing()?;
        self.status = DraftStatus::Finalized;

        Ok(FinalizedInvoice {
            draft_id: self.id,
            kind: self.kind,
            created_at: self.created_at,
            finalized_at: Utc::now(),
            payload: Draft::serialize(self),
        })
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn ensure_editing(&self) -> CoreResult<()> {
        if self.is_finalized() {
            return Err(CoreError::DraftFinalized);
        }
        Ok(())
    }

    fn category_mut(&mut self, kind: CategoryKind) -> CoreResult<&mut Category> {
        self.ensure_editing()?;
        self.categories
            .iter_mut()
            .find(|c| c.kind() == kind)
            .ok_or(CoreError::CategoryInactive(kind))
    }

    fn recompute(&mut self) {
        self.summary = aggregate(&self.categories, self.discount, self.other_cost, &self.policy);
    }
}

// =============================================================================
// Finalized Invoice
// =============================================================================

/// The immutable snapshot produced at submit time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FinalizedInvoice {
    #[ts(type = "string")]
    pub draft_id: Uuid,
    pub kind: InvoiceKind,
    #[ts(type = "string")]
    pub created_at: DateTime<Utc>,
    #[ts(type = "string")]
    pub finalized_at: DateTime<Utc>,
    pub payload: PersistablePayload,
}

// =============================================================================
// Unit Tests
// =============================================================================
