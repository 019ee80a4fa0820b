//! # Quotation Form
//!
//! Working state of the quotation being edited: client fields, the draft
//! line item and the accepted items.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  cliente / direccion / cc          ── client_record() ──► ClientRecord  │
//! │                                                                         │
//! │  descripcion / valor_descripcion   ── add_line_item() ──► items         │
//! │  (draft, cleared only on success)                                       │
//! │                                                                         │
//! │  reset() after a successful generation clears everything; a failed     │
//! │  generation leaves the form untouched so it can be retried.             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use tracing::debug;

use cotizador_core::{ClientRecord, LineItem, LineItemStore, ValidationResult};

#[derive(Debug, Clone, Default, Serialize)]
pub struct QuotationForm {
    /// Client name.
    pub cliente: String,
    /// Client address (optional).
    pub direccion: String,
    /// C.C. or NIT.
    pub cc: String,
    /// Draft item description.
    pub descripcion: String,
    /// Draft item value, raw text; blank hides the price.
    pub valor_descripcion: String,
    /// Accepted line items.
    pub items: LineItemStore,
}

impl QuotationForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Form with the client fields filled in.
    pub fn for_client(cliente: &str, direccion: &str, cc: &str) -> Self {
        QuotationForm {
            cliente: cliente.to_string(),
            direccion: direccion.to_string(),
            cc: cc.to_string(),
            ..Self::default()
        }
    }

    /// Moves the draft item into the list.
    ///
    /// The draft fields are cleared only when the item was accepted.
    pub fn add_line_item(&mut self) -> ValidationResult<()> {
        self.items.add(&self.descripcion, &self.valor_descripcion)?;
        debug!(
            description = %self.descripcion,
            count = self.items.len(),
            "Line item added"
        );
        self.descripcion.clear();
        self.valor_descripcion.clear();
        Ok(())
    }

    /// Sets the draft fields and adds them in one step.
    pub fn add_item(&mut self, description: &str, raw_value: &str) -> ValidationResult<()> {
        self.descripcion = description.to_string();
        self.valor_descripcion = raw_value.to_string();
        self.add_line_item()
    }

    /// Removes the item at `index` (0-based).
    pub fn remove_line_item(&mut self, index: usize) -> ValidationResult<LineItem> {
        let removed = self.items.remove(index)?;
        debug!(index, count = self.items.len(), "Line item removed");
        Ok(removed)
    }

    /// Normalized client record built from the form fields.
    pub fn client_record(&self) -> ClientRecord {
        ClientRecord::new(&self.cliente, &self.direccion, &self.cc)
    }

    /// Clears every field and the item list.
    pub fn reset(&mut self) {
        *self = QuotationForm::default();
    }

    pub fn is_empty(&self) -> bool {
        self.cliente.is_empty()
            && self.direccion.is_empty()
            && self.cc.is_empty()
            && self.descripcion.is_empty()
            && self.valor_descripcion.is_empty()
            && self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cotizador_core::{Money, ValidationError};

    #[test]
    fn test_add_line_item_clears_draft_on_success() {
        let mut form = QuotationForm::new();
        form.descripcion = "Pintura".to_string();
        form.valor_descripcion = "50000".to_string();

        form.add_line_item().unwrap();

        assert!(form.descripcion.is_empty());
        assert!(form.valor_descripcion.is_empty());
        assert_eq!(form.items.total(), Money::from_units(50_000));
    }

    #[test]
    fn test_add_line_item_keeps_draft_on_error() {
        let mut form = QuotationForm::new();
        form.descripcion = "Pintura".to_string();
        form.valor_descripcion = "abc".to_string();

        assert!(matches!(
            form.add_line_item(),
            Err(ValidationError::InvalidNumber { .. })
        ));
        assert_eq!(form.descripcion, "Pintura");
        assert_eq!(form.valor_descripcion, "abc");
        assert!(form.items.is_empty());
    }

    #[test]
    fn test_remove_line_item() {
        let mut form = QuotationForm::new();
        form.add_item("a", "").unwrap();
        form.add_item("b", "").unwrap();

        assert_eq!(form.remove_line_item(0).unwrap().description(), "a");
        assert_eq!(
            form.remove_line_item(5),
            Err(ValidationError::IndexOutOfRange { index: 5, len: 1 })
        );
    }

    #[test]
    fn test_client_record_and_reset() {
        let mut form = QuotationForm::for_client(" Juan Perez ", "", "123");
        form.add_item("Pintura", "1").unwrap();

        let client = form.client_record();
        assert_eq!(client.name, "Juan Perez");
        assert_eq!(client.address, None);

        form.reset();
        assert!(form.is_empty());
    }
}
