//! # Line Item Store
//!
//! Ordered, in-memory list of the line items of the quotation being edited.
//!
//! ## Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Line Item Operations                                 │
//! │                                                                         │
//! │  Form Action              Store Call              Effect                │
//! │  ───────────              ──────────              ──────                │
//! │                                                                         │
//! │  "Agregar Descripción" ──► add(desc, raw) ───────► items.push(item)     │
//! │                                                                         │
//! │  Delete icon ────────────► remove(i) ────────────► items.remove(i)      │
//! │                                                                         │
//! │  Generate ───────────────► snapshot() / total() ─► (read only)          │
//! │                                                                         │
//! │  After success ──────────► clear() ──────────────► items.clear()        │
//! │                                                                         │
//! │  A failed add or remove leaves the list untouched.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::{total_of, LineItem};
use crate::validation::{parse_optional_amount, validate_description};

/// Insertion-ordered collection of line items.
///
/// ## Invariants
/// - Display order is insertion order
/// - Removing an item never reorders the survivors
/// - Items themselves are immutable once added
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LineItemStore {
    items: Vec<LineItem>,
}

impl LineItemStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        LineItemStore { items: Vec::new() }
    }

    /// Validates and appends a line item.
    ///
    /// ## Behavior
    /// - Blank description → `EmptyDescription`
    /// - Blank `raw_value` → stored without a value (price hidden)
    /// - Unparseable `raw_value` → `InvalidNumber`
    ///
    /// Nothing is stored on error.
    pub fn add(&mut self, description: &str, raw_value: &str) -> ValidationResult<()> {
        validate_description(description)?;
        let value = parse_optional_amount(raw_value)?;

        self.items.push(LineItem::new(description, value)?);
        Ok(())
    }

    /// Removes the item at `index` (0-based).
    pub fn remove(&mut self, index: usize) -> ValidationResult<LineItem> {
        if index >= self.items.len() {
            return Err(ValidationError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }

        Ok(self.items.remove(index))
    }

    /// Read-only copy of the items in display order.
    pub fn snapshot(&self) -> Vec<LineItem> {
        self.items.clone()
    }

    /// Borrowed view of the items in display order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Sum of present values; items without a value count as zero.
    pub fn total(&self) -> Money {
        total_of(&self.items)
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
