//! # Draft Registry
//!
//! Holds the drafts a console process currently has open.
//!
//! ## Registry Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Draft Registry Operations                            │
//! │                                                                         │
//! │  Form Action              Registry Call            Draft Change         │
//! │  ───────────              ─────────────            ────────────         │
//! │                                                                         │
//! │  Open new form ──────────► open() ───────────────► insert(Draft::new)   │
//! │                                                                         │
//! │  Edit existing ──────────► open_from_payload() ──► insert(reseeded)     │
//! │                                                                         │
//! │  Type / toggle ──────────► apply_edit() ─────────► draft.apply_edit()   │
//! │                                                                         │
//! │  Submit ─────────────────► submit() ─────────────► finalize + remove    │
//! │                                                                         │
//! │  Cancel ─────────────────► close() ──────────────► remove               │
//! │                                                                         │
//! │  NOTE: Every call takes the Mutex lock exclusively. The lock serialises │
//! │        callers; it does not merge edits from two editors of one draft.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tracing::{debug, info};
use uuid::Uuid;
use workshop_core::{
    BillingPolicy, CategoryKind, Draft, FinalizedInvoice, InvoiceKind, PersistablePayload, RowOp,
    Summary,
};

use crate::error::{SessionError, SessionResult};

/// Shared registry of open drafts.
///
/// `Clone` hands out another handle to the same drafts.
#[derive(Debug, Clone)]
pub struct DraftRegistry {
    drafts: Arc<Mutex<HashMap<Uuid, Draft>>>,
    policy: BillingPolicy,
}

impl DraftRegistry {
    /// Creates an empty registry whose drafts use `policy`.
    pub fn new(policy: BillingPolicy) -> Self {
        DraftRegistry {
            drafts: Arc::new(Mutex::new(HashMap::new())),
            policy,
        }
    }

    pub fn policy(&self) -> &BillingPolicy {
        &self.policy
    }

    /// Opens an empty draft and returns its id.
    pub fn open(&self, kind: InvoiceKind) -> Uuid {
        self.insert(Draft::new(kind, self.policy.clone()))
    }

    /// Opens a draft re-seeded from a stored record and returns its id.
    pub fn open_from_payload(&self, kind: InvoiceKind, payload: &PersistablePayload) -> Uuid {
        self.insert(Draft::from_payload(kind, payload, self.policy.clone()))
    }

    /// Executes a function with read access to a draft.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let gross = registry.with_draft(id, |draft| draft.summary().gross_total)?;
    /// ```
    pub fn with_draft<F, R>(&self, id: Uuid, f: F) -> SessionResult<R>
    where
        F: FnOnce(&Draft) -> R,
    {
        let drafts = self.drafts.lock().expect("Draft registry mutex poisoned");
        drafts.get(&id).map(f).ok_or(SessionError::DraftNotFound(id))
    }

    /// Executes a function with write access to a draft.
    pub fn with_draft_mut<F, R>(&self, id: Uuid, f: F) -> SessionResult<R>
    where
        F: FnOnce(&mut Draft) -> R,
    {
        let mut drafts = self.drafts.lock().expect("Draft registry mutex poisoned");
        drafts.get_mut(&id).map(f).ok_or(SessionError::DraftNotFound(id))
    }

    /// Applies a row operation and returns the recomputed summary.
    pub fn apply_edit(&self, id: Uuid, kind: CategoryKind, op: RowOp) -> SessionResult<Summary> {
        debug!(draft_id = %id, category = %kind, op = ?op, "apply_edit");
        self.with_draft_mut(id, |draft| draft.apply_edit(kind, op).cloned())?
            .map_err(SessionError::from)
    }

    pub fn set_discount(&self, id: Uuid, raw: &str) -> SessionResult<Summary> {
        debug!(draft_id = %id, discount = %raw, "set_discount");
        self.with_draft_mut(id, |draft| draft.set_discount_input(raw).cloned())?
            .map_err(SessionError::from)
    }

    pub fn set_other_cost(&self, id: Uuid, raw: &str) -> SessionResult<Summary> {
        debug!(draft_id = %id, other_cost = %raw, "set_other_cost");
        self.with_draft_mut(id, |draft| draft.set_other_cost_input(raw).cloned())?
            .map_err(SessionError::from)
    }

    /// Flips a category's VAT flag and returns the new value.
    pub fn toggle_vat(&self, id: Uuid, kind: CategoryKind) -> SessionResult<bool> {
        let enabled = self
            .with_draft_mut(id, |draft| draft.toggle_vat(kind))?
            .map_err(SessionError::from)?;
        debug!(draft_id = %id, category = %kind, enabled, "toggle_vat");
        Ok(enabled)
    }

    pub fn summary(&self, id: Uuid) -> SessionResult<Summary> {
        self.with_draft(id, |draft| draft.summary().clone())
    }

    pub fn serialize(&self, id: Uuid) -> SessionResult<PersistablePayload> {
        self.with_draft(id, Draft::serialize)
    }

    /// Finalizes a draft and removes it, returning the snapshot to persist.
    ///
    /// A draft that fails to finalize stays open.
    pub fn submit(&self, id: Uuid) -> SessionResult<FinalizedInvoice> {
        let mut drafts = self.drafts.lock().expect("Draft registry mutex poisoned");
        let draft = drafts.get_mut(&id).ok_or(SessionError::DraftNotFound(id))?;
        let invoice = draft.finalize()?;
        drafts.remove(&id);

        info!(
            draft_id = %id,
            kind = %invoice.kind,
            gross_total = %invoice.payload.summary.gross_total,
            "Draft submitted"
        );
        Ok(invoice)
    }

    /// Discards a draft without finalizing it.
    pub fn close(&self, id: Uuid) -> SessionResult<()> {
        let mut drafts = self.drafts.lock().expect("Draft registry mutex poisoned");
        drafts.remove(&id).ok_or(SessionError::DraftNotFound(id))?;
        info!(draft_id = %id, "Draft closed");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.drafts.lock().expect("Draft registry mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn insert(&self, draft: Draft) -> Uuid {
        let id = draft.id();
        let kind = draft.kind();
        self.drafts
            .lock()
            .expect("Draft registry mutex poisoned")
            .insert(id, draft);
        info!(draft_id = %id, kind = %kind, "Draft opened");
        id
    }
}

impl Default for DraftRegistry {
    fn default() -> Self {
        Self::new(BillingPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use workshop_core::{CoreError, LineField, Money};

    fn update(field: LineField, value: &str) -> RowOp {
        RowOp::Update {
            index: 0,
            field,
            value: value.to_string(),
        }
    }

    #[test]
    fn test_open_and_edit() {
        let registry = DraftRegistry::default();
        let id = registry.open(InvoiceKind::Proforma);

        registry.apply_edit(id, CategoryKind::Labour, RowOp::Add).unwrap();
        registry
            .apply_edit(id, CategoryKind::Labour, update(LineField::UnitCost, "200"))
            .unwrap();
        let summary = registry
            .apply_edit(id, CategoryKind::Labour, update(LineField::EstimatedTime, "2"))
            .unwrap();
        assert_eq!(summary.gross_total, Money::from_major(400));

        assert!(registry.toggle_vat(id, CategoryKind::Labour).unwrap());
        let summary = registry.set_discount(id, "60").unwrap();
        assert_eq!(summary.gross_total, Money::from_major(400));

        let summary = registry.set_other_cost(id, "15").unwrap();
        assert_eq!(summary.gross_total, Money::from_major(415));
        assert_eq!(registry.summary(id).unwrap(), summary);
    }

    #[test]
    fn test_unknown_draft() {
        let registry = DraftRegistry::default();
        let id = Uuid::new_v4();
        assert!(matches!(registry.summary(id), Err(SessionError::DraftNotFound(_))));
        assert!(matches!(registry.close(id), Err(SessionError::DraftNotFound(_))));
        assert!(matches!(registry.submit(id), Err(SessionError::DraftNotFound(_))));
    }

    #[test]
    fn test_engine_errors_propagate() {
        let registry = DraftRegistry::default();
        let id = registry.open(InvoiceKind::Payment);
        let err = registry
            .apply_edit(id, CategoryKind::Spare, RowOp::Remove { index: 0 })
            .unwrap_err();
        assert!(matches!(err, SessionError::Core(CoreError::RowOutOfRange { .. })));
    }

    #[test]
    fn test_submit_removes_draft() {
        let registry = DraftRegistry::default();
        let id = registry.open(InvoiceKind::Payment);
        registry.apply_edit(id, CategoryKind::Other, RowOp::Add).unwrap();
        registry
            .apply_edit(id, CategoryKind::Other, update(LineField::Amount, "80"))
            .unwrap();

        let invoice = registry.submit(id).unwrap();
        assert_eq!(invoice.draft_id, id);
        assert_eq!(invoice.payload.summary.gross_total, Money::from_major(80));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_close_discards_draft() {
        let registry = DraftRegistry::default();
        let a = registry.open(InvoiceKind::Proforma);
        let b = registry.open(InvoiceKind::Payment);
        assert_eq!(registry.len(), 2);

        registry.close(a).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.serialize(b).is_ok());
    }

    #[test]
    fn test_open_from_payload() {
        let registry = DraftRegistry::default();
        let id = registry.open(InvoiceKind::Proforma);
        registry.apply_edit(id, CategoryKind::Spare, RowOp::Add).unwrap();
        registry
            .apply_edit(id, CategoryKind::Spare, update(LineField::Quantity, "3"))
            .unwrap();
        registry
            .apply_edit(id, CategoryKind::Spare, update(LineField::UnitPrice, "150"))
            .unwrap();
        let payload = registry.serialize(id).unwrap();

        let reopened = registry.open_from_payload(InvoiceKind::Proforma, &payload);
        assert_ne!(reopened, id);
        assert_eq!(registry.summary(reopened).unwrap(), registry.summary(id).unwrap());
    }

    #[test]
    fn test_concurrent_edits_are_serialised() {
        let registry = DraftRegistry::default();
        let id = registry.open(InvoiceKind::Payment);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || {
                    registry.apply_edit(id, CategoryKind::Other, RowOp::Add).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let rows = registry
            .with_draft(id, |draft| draft.category(CategoryKind::Other).map(|c| c.len()))
            .unwrap();
        assert_eq!(rows, Some(8));
    }
}
