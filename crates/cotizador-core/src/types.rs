//! # Domain Types
//!
//! Core domain types used throughout Cotizador.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ClientRecord   │   │    LineItem     │   │ QuotationNumber │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name           │   │  description    │   │  u64 from the   │       │
//! │  │  address?       │   │  value?         │   │  counter        │       │
//! │  │  id_number      │   │  (immutable)    │   │  "COT-42"       │       │
//! │  └────────┬────────┘   └────────┬────────┘   └────────┬────────┘       │
//! │           │                     │                     │                 │
//! │           └─────────────────────┼─────────────────────┘                 │
//! │                                 ▼                                       │
//! │                       ┌─────────────────┐                               │
//! │                       │    Quotation    │  built once per generation,   │
//! │                       │  + total, date  │  consumed by the composer     │
//! │                       └─────────────────┘                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;

/// Fixed prefix of every quotation identifier.
pub const QUOTATION_PREFIX: &str = "COT-";

// =============================================================================
// Line Item
// =============================================================================

/// One row of a quotation: a description and an optional value.
///
/// A `None` value means "no price shown": the row renders an empty amount
/// cell but still counts as zero towards the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    description: String,
    value: Option<Money>,
}

impl LineItem {
    /// Creates a line item, trimming the description.
    ///
    /// ## Errors
    /// - `EmptyDescription` when the description is blank
    /// - `InvalidNumber` when the value is negative
    pub fn new(description: impl AsRef<str>, value: Option<Money>) -> ValidationResult<Self> {
        let description = description.as_ref().trim();
        if description.is_empty() {
            return Err(ValidationError::EmptyDescription);
        }

        if let Some(money) = value {
            if money.is_negative() {
                return Err(ValidationError::invalid_number(
                    money.to_string(),
                    "must not be negative",
                ));
            }
        }

        Ok(LineItem {
            description: description.to_string(),
            value,
        })
    }

    /// Description text as entered (trimmed).
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Value, if one was entered.
    pub fn value(&self) -> Option<Money> {
        self.value
    }

    /// Contribution to the quotation total (absent counts as zero).
    pub fn amount(&self) -> Money {
        self.value.unwrap_or_default()
    }
}

// =============================================================================
// Client Record
// =============================================================================

/// Client data collected by the form.
///
/// Fields are public because the composer must be able to reject a record
/// with an empty name; use [`ClientRecord::new`] to get normalized input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Client name (required).
    pub name: String,

    /// Postal address (optional, rendered as an empty field when absent).
    #[serde(default)]
    pub address: Option<String>,

    /// Identification number: C.C. or NIT (required).
    #[serde(rename = "id")]
    pub id_number: String,
}

impl ClientRecord {
    /// Builds a record from raw form text: trims everything and treats a
    /// blank address as absent. Does not validate.
    pub fn new(name: &str, address: &str, id_number: &str) -> Self {
        let address = address.trim();
        ClientRecord {
            name: name.trim().to_string(),
            address: (!address.is_empty()).then(|| address.to_string()),
            id_number: id_number.trim().to_string(),
        }
    }

    /// Address text, empty when absent.
    pub fn address_text(&self) -> &str {
        self.address.as_deref().unwrap_or("")
    }
}

// =============================================================================
// Quotation Number
// =============================================================================

/// Identifier issued by the sequence counter.
///
/// ## Example
/// ```rust
/// use cotizador_core::QuotationNumber;
///
/// assert_eq!(QuotationNumber::new(42).to_string(), "COT-42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuotationNumber(u64);

impl QuotationNumber {
    #[inline]
    pub const fn new(value: u64) -> Self {
        QuotationNumber(value)
    }

    /// The raw counter value.
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// The display label, e.g. `COT-42`.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QuotationNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", QUOTATION_PREFIX, self.0)
    }
}

// =============================================================================
// Quotation
// =============================================================================

/// A quotation ready for composition. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quotation {
    pub client: ClientRecord,
    pub items: Vec<LineItem>,
    /// Sum of item values, absent values counted as zero.
    pub total: Money,
    pub date: NaiveDate,
    pub number: QuotationNumber,
}

impl Quotation {
    /// Assembles a quotation and computes its total.
    pub fn new(
        client: ClientRecord,
        items: Vec<LineItem>,
        number: QuotationNumber,
        date: NaiveDate,
    ) -> Self {
        let total = total_of(&items);
        Quotation {
            client,
            items,
            total,
            date,
            number,
        }
    }
}

/// Sum of all present values; `None` counts as zero.
pub fn total_of(items: &[LineItem]) -> Money {
    items.iter().map(LineItem::amount).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_item_trims_and_rejects_blank() {
        let item = LineItem::new("  Pintura  ", Some(Money::from_units(50_000))).unwrap();
        assert_eq!(item.description(), "Pintura");
        assert_eq!(item.amount(), Money::from_units(50_000));

        assert_eq!(LineItem::new("   ", None), Err(ValidationError::EmptyDescription));
        assert!(LineItem::new("x", Some(Money::from_cents(-1))).is_err());
    }

    #[test]
    fn test_absent_value_counts_as_zero() {
        let items = vec![
            LineItem::new("Pintura", Some(Money::from_units(50_000))).unwrap(),
            LineItem::new("Latonería", None).unwrap(),
        ];
        assert_eq!(total_of(&items), Money::from_units(50_000));
        assert_eq!(total_of(&[]), Money::zero());
    }

    #[test]
    fn test_client_record_normalizes() {
        let client = ClientRecord::new(" Juan Perez ", "   ", " 123 ");
        assert_eq!(client.name, "Juan Perez");
        assert_eq!(client.address, None);
        assert_eq!(client.address_text(), "");
        assert_eq!(client.id_number, "123");
    }

    #[test]
    fn test_quotation_number_label() {
        let number = QuotationNumber::new(2);
        assert_eq!(number.label(), "COT-2");
        assert_eq!(number.value(), 2);
    }

    #[test]
    fn test_quotation_total() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let quotation = Quotation::new(
            ClientRecord::new("Ana", "", "9"),
            vec![
                LineItem::new("a", Some(Money::from_units(10))).unwrap(),
                LineItem::new("b", Some(Money::from_cents(250))).unwrap(),
            ],
            QuotationNumber::new(7),
            date,
        );
        assert_eq!(quotation.total.cents(), 1250);
    }
}
