//! Invoice line items and the totals engine.

mod document;
mod format;
mod items;
mod totals;

pub use document::{AreaUnit, DocumentVariant, ExtraField, InvoiceDetails, InvoiceDocument, ShopHeader};
pub use format::{amount_in_words, format_money};
pub use items::LineItems;
pub use totals::{RoundingPolicy, TaxBucket, TaxMode, Totals, TotalsPolicy, compute_totals};

use crate::catalog::CatalogItem;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A monetary or numeric form value.
///
/// Parsing never fails: empty or non-numeric input becomes zero, so a
/// half-filled form always yields usable arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Amount = Amount(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Parse user input, treating empty or non-numeric text as zero.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::ZERO;
        }
        match Decimal::from_str(trimmed).or_else(|_| Decimal::from_scientific(trimmed)) {
            Ok(value) => Self(value),
            Err(_) => {
                log::debug!("Non-numeric input {trimmed:?} treated as zero");
                Self::ZERO
            }
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// The value, with negatives clamped to zero.
    pub fn non_negative(&self) -> Decimal {
        self.0.max(Decimal::ZERO)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(Decimal::from(value))
    }
}

impl From<i32> for Amount {
    fn from(value: i32) -> Self {
        Self(Decimal::from(value))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.normalize().fmt(f)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl serde::de::Visitor<'_> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a number, a numeric string or null")
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Amount, E> {
                Ok(Amount::from(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Amount, E> {
                Ok(Amount(Decimal::from(v)))
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Amount, E> {
                // Shortest round-trip text keeps 6.6 as 6.6 rather than its binary expansion.
                Ok(if v.is_finite() {
                    Amount::parse(&v.to_string())
                } else {
                    Amount::ZERO
                })
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Amount, E> {
                Ok(Amount::parse(v))
            }

            fn visit_bool<E: serde::de::Error>(self, _: bool) -> Result<Amount, E> {
                Ok(Amount::ZERO)
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Amount, E> {
                Ok(Amount::ZERO)
            }

            fn visit_none<E: serde::de::Error>(self) -> Result<Amount, E> {
                Ok(Amount::ZERO)
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}

/// Editable field of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemField {
    Description,
    SizeLabel,
    Quantity,
    UnitRate,
    TaxRate,
}

/// One priced row of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub size_label: String,
    #[serde(default)]
    pub quantity: Amount,
    #[serde(default)]
    pub unit_rate: Amount,
    /// GST rate for this item, used when tax is computed per item.
    #[serde(default)]
    pub tax_rate_percent: Amount,
    /// Catalog entry this row was picked from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog_id: Option<Uuid>,
}

impl LineItem {
    /// Create a line item with no per-item tax rate.
    pub fn new(
        description: impl Into<String>,
        size_label: impl Into<String>,
        quantity: impl Into<Amount>,
        unit_rate: impl Into<Amount>,
    ) -> Self {
        Self {
            description: description.into(),
            size_label: size_label.into(),
            quantity: quantity.into(),
            unit_rate: unit_rate.into(),
            tax_rate_percent: Amount::ZERO,
            catalog_id: None,
        }
    }

    /// Builder-style per-item tax rate.
    pub fn with_tax_rate(mut self, percent: impl Into<Amount>) -> Self {
        self.tax_rate_percent = percent.into();
        self
    }

    /// A fresh row as added by the "add item" action: quantity 1, rate 0, GST 5%.
    pub fn blank() -> Self {
        Self::new("", "", 1, 0).with_tax_rate(5)
    }

    /// A row filled from a catalog entry, quantity 1.
    pub fn from_catalog(item: &CatalogItem) -> Self {
        Self {
            description: item.label(),
            size_label: item.size.clone(),
            quantity: Amount::from(1),
            unit_rate: item.shop_rate,
            tax_rate_percent: item.gst_percent,
            catalog_id: Some(item.id),
        }
    }

    /// `quantity × unit_rate`, with negative inputs treated as zero.
    /// Saturates at `Decimal::MAX` instead of overflowing.
    pub fn line_amount(&self) -> Decimal {
        totals::mul_saturating(self.quantity.non_negative(), self.unit_rate.non_negative())
    }

    /// Apply a text edit to one field. Numeric fields parse leniently.
    pub fn set_field(&mut self, field: ItemField, value: &str) {
        match field {
            ItemField::Description => self.description = value.to_string(),
            ItemField::SizeLabel => self.size_label = value.to_string(),
            ItemField::Quantity => self.quantity = Amount::parse(value),
            ItemField::UnitRate => self.unit_rate = Amount::parse(value),
            ItemField::TaxRate => self.tax_rate_percent = Amount::parse(value),
        }
    }
}

/// Inputs to the totals engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TotalsInput {
    /// Rows in display order (also summation order).
    #[serde(default)]
    pub items: LineItems,
    #[serde(default)]
    pub installation_charge: Amount,
    /// Subtracted before tax.
    #[serde(default)]
    pub discount: Amount,
    /// Manual signed correction; ignored when round-off is automatic.
    #[serde(default)]
    pub round_off: Amount,
    /// Invoice-level tax rate; ignored when tax is computed per item.
    #[serde(default)]
    pub tax_percent: Amount,
}

impl Default for TotalsInput {
    fn default() -> Self {
        Self {
            items: LineItems::new(),
            installation_charge: Amount::ZERO,
            discount: Amount::ZERO,
            round_off: Amount::ZERO,
            tax_percent: Amount::from(18),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_numeric() {
        assert_eq!(Amount::parse("30").value(), Decimal::from(30));
        assert_eq!(Amount::parse(" 6.6 ").value(), Decimal::new(66, 1));
        assert_eq!(Amount::parse("-2.5").value(), Decimal::new(-25, 1));
        assert_eq!(Amount::parse("1e3").value(), Decimal::from(1000));
    }

    #[test]
    fn test_parse_garbage_is_zero() {
        assert_eq!(Amount::parse("abc"), Amount::ZERO);
        assert_eq!(Amount::parse(""), Amount::ZERO);
        assert_eq!(Amount::parse("   "), Amount::ZERO);
        assert_eq!(Amount::parse("12abc"), Amount::ZERO);
    }

    #[test]
    fn test_non_numeric_quantity_amount_is_zero() {
        let mut item = LineItem::new("Nozzle", "", 1, 50);
        item.set_field(ItemField::Quantity, "abc");
        assert_eq!(item.line_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_line_amount_saturates() {
        let item = LineItem::new("Huge", "", Amount::new(Decimal::MAX), 2);
        assert_eq!(item.line_amount(), Decimal::MAX);
    }

    #[test]
    fn test_line_amount_fractional() {
        let item = LineItem::new("Lateral", "20mm", Amount::parse("2.5"), Amount::parse("6.6"));
        assert_eq!(item.line_amount(), Decimal::new(165, 1));
    }

    #[test]
    fn test_set_text_fields() {
        let mut item = LineItem::blank();
        item.set_field(ItemField::Description, "Sprinkler pipe");
        item.set_field(ItemField::SizeLabel, "3/4\"");
        item.set_field(ItemField::UnitRate, "659");
        assert_eq!(item.description, "Sprinkler pipe");
        assert_eq!(item.size_label, "3/4\"");
        assert_eq!(item.line_amount(), Decimal::from(659));
    }

    #[test]
    fn test_lenient_deserialization() {
        let item: LineItem = serde_json::from_str(
            r#"{"description":"Pipe","quantity":"30","unit_rate":659.5,"tax_rate_percent":null}"#,
        )
        .unwrap();
        assert_eq!(item.quantity.value(), Decimal::from(30));
        assert_eq!(item.unit_rate.value(), Decimal::new(6595, 1));
        assert_eq!(item.tax_rate_percent, Amount::ZERO);
        assert_eq!(item.size_label, "");

        let garbage: LineItem =
            serde_json::from_str(r#"{"quantity":"abc","unit_rate":""}"#).unwrap();
        assert_eq!(garbage.line_amount(), Decimal::ZERO);
    }

    #[test]
    fn test_float_input_keeps_short_form() {
        let amount: Amount = serde_json::from_str("6.6").unwrap();
        assert_eq!(amount.value(), Decimal::new(66, 1));
    }
}
