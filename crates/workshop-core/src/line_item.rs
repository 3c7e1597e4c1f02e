//! # Line Items
//!
//! One row of cost data. The row's shape depends on its category.
//!
//! ## Row Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Labour   description │ unit │ est_time │ cost       │ total = cost×time│
//! │  Spare    description │ part_number │ unit │ brand │ qty │ unit_price   │
//! │                                                     │ total = qty×price│
//! │  Other    description │ amount (its own total)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Derived Totals
//! Fields are private. Every write goes through [`LineItem::set_field`] (or a
//! constructor), which recomputes `total` before returning, so no reader can
//! observe a row whose total disagrees with its inputs. Deserialization goes
//! through the same constructors: a persisted `total` is never trusted.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::{Money, Quantity};
use crate::payload::wire;
use crate::types::CategoryKind;

// =============================================================================
// Field Vocabulary
// =============================================================================

/// An editable (or addressable) line-item field, by wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum LineField {
    Description,
    Unit,
    #[serde(rename = "est_time")]
    EstimatedTime,
    #[serde(rename = "cost")]
    UnitCost,
    PartNumber,
    Brand,
    #[serde(rename = "qty")]
    Quantity,
    UnitPrice,
    Amount,
    /// Always derived; addressing it is rejected.
    Total,
}

impl LineField {
    pub const fn as_str(&self) -> &'static str {
        match self {
            LineField::Description => "description",
            LineField::Unit => "unit",
            LineField::EstimatedTime => "est_time",
            LineField::UnitCost => "cost",
            LineField::PartNumber => "part_number",
            LineField::Brand => "brand",
            LineField::Quantity => "qty",
            LineField::UnitPrice => "unit_price",
            LineField::Amount => "amount",
            LineField::Total => "total",
        }
    }
}

impl fmt::Display for LineField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LineField {
    type Err = CoreError;

    /// Accepts wire names and the camelCase names used by the form layer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "description" => Ok(LineField::Description),
            "unit" => Ok(LineField::Unit),
            "est_time" | "estTime" | "estimatedTime" => Ok(LineField::EstimatedTime),
            "cost" | "unitCost" | "unit_cost" => Ok(LineField::UnitCost),
            "part_number" | "partNumber" => Ok(LineField::PartNumber),
            "brand" => Ok(LineField::Brand),
            "qty" | "quantity" => Ok(LineField::Quantity),
            "unit_price" | "unitPrice" => Ok(LineField::UnitPrice),
            "amount" => Ok(LineField::Amount),
            "total" => Ok(LineField::Total),
            other => Err(CoreError::UnknownField(other.to_string())),
        }
    }
}

// =============================================================================
// Labour
// =============================================================================

/// A labour row: time × hourly (or per-unit) cost.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(from = "LabourRow")]
pub struct LabourItem {
    description: String,
    unit: String,
    #[serde(serialize_with = "wire::ser_quantity")]
    #[ts(type = "number")]
    est_time: Quantity,
    #[serde(serialize_with = "wire::ser_money")]
    #[ts(type = "number")]
    cost: Money,
    #[serde(serialize_with = "wire::ser_money")]
    #[ts(type = "number")]
    total: Money,
}

impl LabourItem {
    pub fn new(
        description: impl Into<String>,
        unit: impl Into<String>,
        est_time: Quantity,
        cost: Money,
    ) -> Self {
        LabourItem {
            description: description.into(),
            unit: unit.into(),
            est_time,
            cost,
            total: cost.times(est_time),
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn est_time(&self) -> Quantity {
        self.est_time
    }

    pub fn cost(&self) -> Money {
        self.cost
    }

    /// `cost × est_time`, rounded to the cent.
    pub fn total(&self) -> Money {
        self.total
    }

    fn recompute(&mut self) {
        self.total = self.cost.times(self.est_time);
    }
}

#[derive(Deserialize)]
struct LabourRow {
    #[serde(default, deserialize_with = "wire::de_text")]
    description: String,
    #[serde(default, deserialize_with = "wire::de_text")]
    unit: String,
    #[serde(default, alias = "estTime", deserialize_with = "wire::de_quantity")]
    est_time: Quantity,
    #[serde(default, alias = "unitCost", deserialize_with = "wire::de_money")]
    cost: Money,
}

impl From<LabourRow> for LabourItem {
    fn from(row: LabourRow) -> Self {
        LabourItem::new(row.description, row.unit, row.est_time, row.cost)
    }
}

// =============================================================================
// Spare Part
// =============================================================================

/// A spare-part row: quantity × unit price.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(from = "SpareRow")]
pub struct SpareItem {
    description: String,
    part_number: String,
    unit: String,
    brand: String,
    #[serde(serialize_with = "wire::ser_quantity")]
    #[ts(type = "number")]
    qty: Quantity,
    #[serde(serialize_with = "wire::ser_money")]
    #[ts(type = "number")]
    unit_price: Money,
    #[serde(serialize_with = "wire::ser_money")]
    #[ts(type = "number")]
    total: Money,
}

impl SpareItem {
    pub fn new(
        description: impl Into<String>,
        part_number: impl Into<String>,
        brand: impl Into<String>,
        qty: Quantity,
        unit_price: Money,
    ) -> Self {
        SpareItem {
            description: description.into(),
            part_number: part_number.into(),
            unit: String::new(),
            brand: brand.into(),
            qty,
            unit_price,
            total: unit_price.times(qty),
        }
    }

    /// Sets the unit-of-measure column ("pcs", "litre").
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn part_number(&self) -> &str {
        &self.part_number
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn qty(&self) -> Quantity {
        self.qty
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// `qty × unit_price`, rounded to the cent.
    pub fn total(&self) -> Money {
        self.total
    }

    fn recompute(&mut self) {
        self.total = self.unit_price.times(self.qty);
    }
}

#[derive(Deserialize)]
struct SpareRow {
    #[serde(default, deserialize_with = "wire::de_text")]
    description: String,
    #[serde(default, alias = "partNumber", deserialize_with = "wire::de_text")]
    part_number: String,
    #[serde(default, deserialize_with = "wire::de_text")]
    unit: String,
    #[serde(default, deserialize_with = "wire::de_text")]
    brand: String,
    #[serde(default, alias = "quantity", deserialize_with = "wire::de_quantity")]
    qty: Quantity,
    #[serde(default, alias = "unitPrice", deserialize_with = "wire::de_money")]
    unit_price: Money,
}

impl From<SpareRow> for SpareItem {
    fn from(row: SpareRow) -> Self {
        SpareItem::new(row.description, row.part_number, row.brand, row.qty, row.unit_price)
            .with_unit(row.unit)
    }
}

// =============================================================================
// Other Cost
// =============================================================================

/// A flat cost row; `amount` is its own total.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OtherItem {
    #[serde(default, deserialize_with = "wire::de_text")]
    description: String,
    #[serde(
        default,
        serialize_with = "wire::ser_money",
        deserialize_with = "wire::de_money"
    )]
    #[ts(type = "number")]
    amount: Money,
}

impl OtherItem {
    pub fn new(description: impl Into<String>, amount: Money) -> Self {
        OtherItem {
            description: description.into(),
            amount,
        }
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Money {
        self.amount
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A row tagged with its category, as emitted in flat exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum LineItem {
    Labour(LabourItem),
    Spare(SpareItem),
    Other(OtherItem),
}

impl LineItem {
    /// A zero-valued row of the category's shape.
    pub fn blank(kind: CategoryKind) -> Self {
        match kind {
            CategoryKind::Labour => LineItem::Labour(LabourItem::default()),
            CategoryKind::Spare => LineItem::Spare(SpareItem::default()),
            CategoryKind::Other => LineItem::Other(OtherItem::default()),
        }
    }

    pub fn kind(&self) -> CategoryKind {
        match self {
            LineItem::Labour(_) => CategoryKind::Labour,
            LineItem::Spare(_) => CategoryKind::Spare,
            LineItem::Other(_) => CategoryKind::Other,
        }
    }

    /// The row's contribution to its category subtotal.
    pub fn total(&self) -> Money {
        match self {
            LineItem::Labour(item) => item.total(),
            LineItem::Spare(item) => item.total(),
            LineItem::Other(item) => item.amount(),
        }
    }

    /// Writes one field from raw form text and recomputes the derived total.
    ///
    /// Numeric fields never fail: non-numeric text is stored as zero.
    ///
    /// ## Example
    /// ```rust
    /// use workshop_core::line_item::{LineField, LineItem};
    /// use workshop_core::money::Money;
    /// use workshop_core::types::CategoryKind;
    ///
    /// let mut row = LineItem::blank(CategoryKind::Labour);
    /// row.set_field(LineField::UnitCost, "200").unwrap();
    /// row.set_field(LineField::EstimatedTime, "2").unwrap();
    /// assert_eq!(row.total(), Money::from_major(400));
    ///
    /// row.set_field(LineField::EstimatedTime, "two").unwrap();
    /// assert!(row.total().is_zero());
    /// ```
    pub fn set_field(&mut self, field: LineField, raw: &str) -> CoreResult<()> {
        let kind = self.kind();
        let not_applicable = || CoreError::FieldNotApplicable { kind, field };

        match self {
            LineItem::Labour(item) => {
                match field {
                    LineField::Description => item.description = raw.to_string(),
                    LineField::Unit => item.unit = raw.to_string(),
                    LineField::EstimatedTime => item.est_time = Quantity::parse_lenient(raw),
                    LineField::UnitCost => item.cost = Money::parse_lenient(raw),
                    _ => return Err(not_applicable()),
                }
                item.recompute();
            }
            LineItem::Spare(item) => {
                match field {
                    LineField::Description => item.description = raw.to_string(),
                    LineField::PartNumber => item.part_number = raw.to_string(),
                    LineField::Unit => item.unit = raw.to_string(),
                    LineField::Brand => item.brand = raw.to_string(),
                    LineField::Quantity => item.qty = Quantity::parse_lenient(raw),
                    LineField::UnitPrice => item.unit_price = Money::parse_lenient(raw),
                    _ => return Err(not_applicable()),
                }
                item.recompute();
            }
            LineItem::Other(item) => match field {
                LineField::Description => item.description = raw.to_string(),
                LineField::Amount => item.amount = Money::parse_lenient(raw),
                _ => return Err(not_applicable()),
            },
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
