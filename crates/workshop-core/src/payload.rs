//! # Persistable Payload
//!
//! The JSON record handed to the create/update call, the print template and
//! the read-only view modal.
//!
//! ## Wire Shape
//! ```text
//! {
//!   "labour_items": [{ description, unit, est_time, cost, total }],
//!   "spare_items":  [{ description, part_number, unit, brand, qty, unit_price, total }],
//!   "other_costs":  [{ description, amount }],
//!   "labour_vat": true, "spare_vat": false, "other_vat": false,
//!   "discount": 50, "other_cost": 0,
//!   "summary": { total, totalVat, grossTotal, netPay, netPayInWords }
//! }
//! ```
//!
//! Amounts are numbers in major units (`400`, `12.5`). Downstream consumers
//! read totals from here and never recompute them. When a stored record is
//! loaded back, the `summary` block and every row `total` are ignored and
//! rebuilt from the inputs.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::line_item::{LabourItem, LineItem, OtherItem, SpareItem};
use crate::money::Money;
use crate::summary::Summary;

/// The full persisted record of a draft.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PersistablePayload {
    #[serde(default, deserialize_with = "wire::de_rows")]
    pub labour_items: Vec<LabourItem>,
    #[serde(default, deserialize_with = "wire::de_rows")]
    pub spare_items: Vec<SpareItem>,
    #[serde(default, deserialize_with = "wire::de_rows")]
    pub other_costs: Vec<OtherItem>,
    #[serde(default, deserialize_with = "wire::de_flag")]
    pub labour_vat: bool,
    #[serde(default, deserialize_with = "wire::de_flag")]
    pub spare_vat: bool,
    #[serde(default, deserialize_with = "wire::de_flag")]
    pub other_vat: bool,
    #[serde(default, serialize_with = "wire::ser_money", deserialize_with = "wire::de_money")]
    #[ts(type = "number")]
    pub discount: Money,
    #[serde(default, serialize_with = "wire::ser_money", deserialize_with = "wire::de_money")]
    #[ts(type = "number")]
    pub other_cost: Money,
    #[serde(default)]
    pub summary: PayloadSummary,
}

impl PersistablePayload {
    /// Parses a stored record. Only structural problems (not an object, a
    /// row list that is not a list) are errors.
    pub fn from_json_str(json: &str) -> CoreResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_value(value: serde_json::Value) -> CoreResult<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json_value(&self) -> CoreResult<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string_pretty(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// One record per row, tagged with its category, in payload order.
    pub fn flat_rows(&self) -> Vec<LineItem> {
        self.labour_items
            .iter()
            .cloned()
            .map(LineItem::Labour)
            .chain(self.spare_items.iter().cloned().map(LineItem::Spare))
            .chain(self.other_costs.iter().cloned().map(LineItem::Other))
            .collect()
    }
}

/// The totals block of the payload, as print and view templates read it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", default)]
pub struct PayloadSummary {
    /// Combined subtotal before VAT and adjustments.
    #[serde(serialize_with = "wire::ser_money", deserialize_with = "wire::de_money")]
    #[ts(type = "number")]
    pub total: Money,
    #[serde(serialize_with = "wire::ser_money", deserialize_with = "wire::de_money")]
    #[ts(type = "number")]
    pub total_vat: Money,
    #[serde(serialize_with = "wire::ser_money", deserialize_with = "wire::de_money")]
    #[ts(type = "number")]
    pub gross_total: Money,
    #[serde(serialize_with = "wire::ser_money", deserialize_with = "wire::de_money")]
    #[ts(type = "number")]
    pub net_pay: Money,
    #[serde(deserialize_with = "wire::de_text")]
    pub net_pay_in_words: String,
}

impl From<&Summary> for PayloadSummary {
    fn from(summary: &Summary) -> Self {
        PayloadSummary {
            total: summary.combined_subtotal,
            total_vat: summary.combined_vat,
            gross_total: summary.gross_total,
            net_pay: summary.net_pay,
            net_pay_in_words: summary.net_pay_words.clone(),
        }
    }
}

/// Serde adapters between engine types and the lenient JSON wire format.
pub(crate) mod wire {
    use serde::de::DeserializeOwned;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;
    use std::collections::BTreeMap;

    use crate::money::{Money, Quantity};

    /// Integral amounts as JSON integers (`400`), others as floats (`12.5`).
    pub fn ser_money<S: Serializer>(money: &Money, s: S) -> Result<S::Ok, S::Error> {
        if money.cents_part() == 0 {
            s.serialize_i64(money.major())
        } else {
            s.serialize_f64(money.to_major_f64())
        }
    }

    /// A map of amounts, each written as [`ser_money`] writes it.
    pub fn ser_money_map<K, S>(map: &BTreeMap<K, Money>, s: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        S: Serializer,
    {
        struct MajorUnits(Money);

        impl Serialize for MajorUnits {
            fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                ser_money(&self.0, s)
            }
        }

        let mut out = s.serialize_map(Some(map.len()))?;
        for (key, money) in map {
            out.serialize_entry(key, &MajorUnits(*money))?;
        }
        out.end()
    }

    pub fn de_money_map<'de, D, K>(d: D) -> Result<BTreeMap<K, Money>, D::Error>
    where
        D: Deserializer<'de>,
        K: Deserialize<'de> + Ord,
    {
        let raw = BTreeMap::<K, Value>::deserialize(d)?;
        Ok(raw
            .into_iter()
            .map(|(key, value)| (key, Money::from_json_lenient(&value)))
            .collect())
    }

    pub fn ser_quantity<S: Serializer>(qty: &Quantity, s: S) -> Result<S::Ok, S::Error> {
        if qty.milli() % 1000 == 0 {
            s.serialize_i64(qty.milli() / 1000)
        } else {
            s.serialize_f64(qty.to_f64())
        }
    }

    pub fn de_money<'de, D: Deserializer<'de>>(d: D) -> Result<Money, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(Money::from_json_lenient(&value))
    }

    pub fn de_quantity<'de, D: Deserializer<'de>>(d: D) -> Result<Quantity, D::Error> {
        let value = Value::deserialize(d)?;
        Ok(Quantity::from_json_lenient(&value))
    }

    /// Strings as-is, numbers stringified, anything else empty.
    pub fn de_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        })
    }

    /// Booleans, plus the `0`/`1` and `"true"`/`"false"` forms older records use.
    pub fn de_flag<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        Ok(match Value::deserialize(d)? {
            Value::Bool(b) => b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => matches!(s.trim().to_lowercase().as_str(), "true" | "1" | "yes"),
            _ => false,
        })
    }

    /// A row list; `null` is an empty list.
    pub fn de_rows<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
