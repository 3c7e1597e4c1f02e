//! # Summary Aggregation
//!
//! Combines category aggregates with the discount and flat other-cost
//! adjustment into the invoice summary.
//!
//! ## Combination Order (fixed)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. combined_subtotal = Σ category subtotals                            │
//! │  2. combined_vat      = Σ category VAT                                  │
//! │  3.   + other_cost                                                      │
//! │  4.   − discount                                                        │
//! │  5. gross_total       = max(result, 0)                                  │
//! │  6. net_pay           = gross_total                                     │
//! │  7. net_pay_words     = amount_in_words(net_pay)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`aggregate`] is a pure reduction over the full draft. It is rerun from
//! scratch after every edit, so there are no partial sums to go stale.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ts_rs::TS;

use crate::category::{Category, CategoryTotals};
use crate::money::Money;
use crate::payload::wire;
use crate::types::{BillingPolicy, CategoryKind};
use crate::words::amount_in_words;

/// Snapshot of every total on a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(serialize_with = "wire::ser_money_map", deserialize_with = "wire::de_money_map")]
    #[ts(type = "Partial<Record<\"labour\" | \"spare\" | \"other\", number>>")]
    pub subtotal_by_category: BTreeMap<CategoryKind, Money>,
    #[serde(serialize_with = "wire::ser_money_map", deserialize_with = "wire::de_money_map")]
    #[ts(type = "Partial<Record<\"labour\" | \"spare\" | \"other\", number>>")]
    pub vat_by_category: BTreeMap<CategoryKind, Money>,
    #[serde(serialize_with = "wire::ser_money", deserialize_with = "wire::de_money")]
    #[ts(type = "number")]
    pub combined_subtotal: Money,
    #[serde(serialize_with = "wire::ser_money", deserialize_with = "wire::de_money")]
    #[ts(type = "number")]
    pub combined_vat: Money,
    #[serde(serialize_with = "wire::ser_money", deserialize_with = "wire::de_money")]
    #[ts(type = "number")]
    pub discount: Money,
    #[serde(serialize_with = "wire::ser_money", deserialize_with = "wire::de_money")]
    #[ts(type = "number")]
    pub other_cost: Money,
    /// Never negative.
    #[serde(serialize_with = "wire::ser_money", deserialize_with = "wire::de_money")]
    #[ts(type = "number")]
    pub gross_total: Money,
    /// Equal to `gross_total`. Kept separate so a withholding deduction can
    /// be introduced without changing the payload contract.
    #[serde(serialize_with = "wire::ser_money", deserialize_with = "wire::de_money")]
    #[ts(type = "number")]
    pub net_pay: Money,
    pub net_pay_words: String,
}

impl Summary {
    /// The summary of a draft with no categories and no adjustments.
    pub fn empty(policy: &BillingPolicy) -> Self {
        aggregate(std::iter::empty(), Money::zero(), Money::zero(), policy)
    }

    /// Subtotal and VAT of one category, if it is part of this summary.
    pub fn category(&self, kind: CategoryKind) -> Option<CategoryTotals> {
        let subtotal = *self.subtotal_by_category.get(&kind)?;
        let vat = self.vat_by_category.get(&kind).copied().unwrap_or_default();
        Some(CategoryTotals { kind, subtotal, vat })
    }
}

/// Recomputes the full summary from the draft's categories and adjustments.
///
/// ## Example
/// ```rust
/// use workshop_core::category::Category;
/// use workshop_core::line_item::LineField;
/// use workshop_core::money::Money;
/// use workshop_core::summary::aggregate;
/// use workshop_core::types::{BillingPolicy, CategoryKind};
///
/// let mut labour = Category::new(CategoryKind::Labour);
/// let row = labour.add_row();
/// labour.update_field(row, LineField::UnitCost, "200").unwrap();
/// labour.update_field(row, LineField::EstimatedTime, "2").unwrap();
/// labour.set_vat(true);
///
/// let summary = aggregate([&labour], Money::from_major(10), Money::zero(), &BillingPolicy::default());
/// assert_eq!(summary.gross_total, Money::from_major(450));
/// ```
pub fn aggregate<'a, I>(
    categories: I,
    discount: Money,
    other_cost: Money,
    policy: &BillingPolicy,
) -> Summary
where
    I: IntoIterator<Item = &'a Category>,
{
    let mut subtotal_by_category = BTreeMap::new();
    let mut vat_by_category = BTreeMap::new();

    for category in categories {
        let totals = category.totals(policy.vat_rate);
        subtotal_by_category.insert(totals.kind, totals.subtotal);
        vat_by_category.insert(totals.kind, totals.vat);
    }

    let combined_subtotal: Money = subtotal_by_category.values().sum();
    let combined_vat: Money = vat_by_category.values().sum();

    let gross_total = (combined_subtotal + combined_vat + other_cost - discount).clamp_non_negative();
    let net_pay = gross_total;

    Summary {
        subtotal_by_category,
        vat_by_category,
        combined_subtotal,
        combined_vat,
        discount,
        other_cost,
        gross_total,
        net_pay,
        net_pay_words: amount_in_words(net_pay, &policy.words),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_item::LineField;
    use proptest::prelude::*;

    fn labour(cost: &str, time: &str, vat: bool) -> Category {
        let mut category = Category::new(CategoryKind::Labour);
        let i = category.add_row();
        category.update_field(i, LineField::UnitCost, cost).unwrap();
        category.update_field(i, LineField::EstimatedTime, time).unwrap();
        category.set_vat(vat);
        category
    }

    fn spare(qty: &str, price: &str, vat: bool) -> Category {
        let mut category = Category::new(CategoryKind::Spare);
        let i = category.add_row();
        category.update_field(i, LineField::Quantity, qty).unwrap();
        category.update_field(i, LineField::UnitPrice, price).unwrap();
        category.set_vat(vat);
        category
    }

    fn other(amount_cents: i64) -> Category {
        let mut category = Category::new(CategoryKind::Other);
        let i = category.add_row();
        category
            .update_field(i, LineField::Amount, &Money::from_cents(amount_cents).to_string())
            .unwrap();
        category
    }

    #[test]
    fn test_combined_labour_and_spare() {
        let categories = [labour("200", "2", true), spare("3", "150", false)];
        let summary = aggregate(&categories, Money::from_major(50), Money::zero(), &BillingPolicy::default());

        assert_eq!(summary.subtotal_by_category[&CategoryKind::Labour], Money::from_major(400));
        assert_eq!(summary.vat_by_category[&CategoryKind::Labour], Money::from_major(60));
        assert_eq!(summary.subtotal_by_category[&CategoryKind::Spare], Money::from_major(450));
        assert!(summary.vat_by_category[&CategoryKind::Spare].is_zero());

        assert_eq!(summary.combined_subtotal, Money::from_major(850));
        assert_eq!(summary.combined_vat, Money::from_major(60));
        assert_eq!(summary.gross_total, Money::from_major(860));
        assert_eq!(summary.net_pay, Money::from_major(860));
        assert_eq!(summary.net_pay_words, "Eight Hundred Sixty Birr Only");
    }

    #[test]
    fn test_discount_clamps_to_zero() {
        let categories = [spare("1", "500", false)];
        let summary = aggregate(&categories, Money::from_major(10_000), Money::zero(), &BillingPolicy::default());

        assert!(summary.gross_total.is_zero());
        assert!(summary.net_pay.is_zero());
        assert_eq!(summary.net_pay_words, "Zero Birr Only");
    }

    #[test]
    fn test_other_cost_added() {
        let categories = [labour("100", "1", false)];
        let summary = aggregate(&categories, Money::zero(), Money::from_major(25), &BillingPolicy::default());
        assert_eq!(summary.gross_total, Money::from_major(125));
    }

    #[test]
    fn test_empty_summary() {
        let summary = Summary::empty(&BillingPolicy::default());
        assert!(summary.subtotal_by_category.is_empty());
        assert!(summary.gross_total.is_zero());
        assert!(summary.category(CategoryKind::Labour).is_none());
    }

    #[test]
    fn test_category_lookup() {
        let categories = [labour("200", "2", true)];
        let summary = aggregate(&categories, Money::zero(), Money::zero(), &BillingPolicy::default());
        let totals = summary.category(CategoryKind::Labour).unwrap();
        assert_eq!(totals.vat, Money::from_major(60));
    }

    #[test]
    fn test_json_uses_major_units() {
        let categories = [labour("200", "2", true), spare("1", "12.5", false)];
        let summary = aggregate(&categories, Money::from_major(50), Money::zero(), &BillingPolicy::default());
        let value = serde_json::to_value(&summary).unwrap();

        assert_eq!(value["subtotalByCategory"]["labour"], 400);
        assert_eq!(value["subtotalByCategory"]["spare"], 12.5);
        assert_eq!(value["vatByCategory"]["labour"], 60);
        assert_eq!(value["combinedSubtotal"], 412.5);
        assert_eq!(value["discount"], 50);
        assert_eq!(value["grossTotal"], 422.5);

        let back: Summary = serde_json::from_value(value).unwrap();
        assert_eq!(back, summary);

        let totals = serde_json::to_value(summary.category(CategoryKind::Labour).unwrap()).unwrap();
        assert_eq!(totals["subtotal"], 400);
        assert_eq!(totals["vat"], 60);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: gross total never goes below zero.
        #[test]
        fn gross_total_is_never_negative(
            amount in -1_000_000i64..1_000_000i64,
            discount in -1_000_000i64..10_000_000i64,
            other_cost in -1_000_000i64..1_000_000i64,
        ) {
            let categories = [other(amount)];
            let summary = aggregate(
                &categories,
                Money::from_cents(discount),
                Money::from_cents(other_cost),
                &BillingPolicy::default(),
            );
            prop_assert!(!summary.gross_total.is_negative());
            prop_assert_eq!(summary.net_pay, summary.gross_total);
        }

        /// Property: raising other cost never lowers the gross total, raising
        /// the discount never raises it.
        #[test]
        fn gross_total_is_monotone(
            amount in 0i64..1_000_000i64,
            discount in 0i64..1_000_000i64,
            other_cost in 0i64..1_000_000i64,
            bump in 0i64..1_000_000i64,
        ) {
            let categories = [other(amount)];
            let policy = BillingPolicy::default();
            let run = |d: i64, o: i64| {
                aggregate(&categories, Money::from_cents(d), Money::from_cents(o), &policy).gross_total
            };

            let base = run(discount, other_cost);
            prop_assert!(run(discount, other_cost + bump) >= base);
            prop_assert!(run(discount + bump, other_cost) <= base);
        }

        /// Property: combined values are the sums of the per-category values.
        #[test]
        fn combined_values_are_sums(
            cost in 0u32..100_000u32,
            time in 0u32..100u32,
            qty in 0u32..100u32,
            price in 0u32..100_000u32,
            labour_vat: bool,
            spare_vat: bool,
        ) {
            let categories = [
                labour(&cost.to_string(), &time.to_string(), labour_vat),
                spare(&qty.to_string(), &price.to_string(), spare_vat),
            ];
            let summary = aggregate(&categories, Money::zero(), Money::zero(), &BillingPolicy::default());

            let subtotals: Money = summary.subtotal_by_category.values().sum();
            let vats: Money = summary.vat_by_category.values().sum();
            prop_assert_eq!(summary.combined_subtotal, subtotals);
            prop_assert_eq!(summary.combined_vat, vats);
            prop_assert_eq!(summary.gross_total, subtotals + vats);
        }
    }
}
