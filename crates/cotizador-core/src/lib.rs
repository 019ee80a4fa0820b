//! # cotizador-core: Pure Quotation Logic
//!
//! Everything about a quotation that does not touch the outside world:
//! money, line items, validation and the document tree.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cotizador Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    cotizador CLI (apps/cli)                     │   │
//! │  │    form state ──► QuotationGenerator ──► commands               │   │
//! │  └───────┬─────────────────────┬──────────────────────┬────────────┘   │
//! │          │                     │                      │                 │
//! │  ┌───────▼──────────────┐  ┌───▼──────────────┐  ┌────▼─────────────┐  │
//! │  │ ★ cotizador-core ★   │  │  cotizador-db    │  │ cotizador-render │  │
//! │  │  Money, LineItem,    │  │  sequence        │  │  PDF / HTML      │  │
//! │  │  Document tree       │  │  counter         │  │  artifacts       │  │
//! │  │  NO I/O              │  │  (SQLite)        │  │                  │  │
//! │  └──────────────────────┘  └──────────────────┘  └──────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer money and peso formatting
//! - [`types`] - LineItem, ClientRecord, QuotationNumber, Quotation
//! - [`line_items`] - Ordered item list behind the form
//! - [`validation`] - Input checks
//! - [`template`] - Company letterhead and document labels
//! - [`document`] - Document tree and composer
//! - [`error`] - Validation errors
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use cotizador_core::{ClientRecord, DocumentComposer, LineItemStore, QuotationNumber};
//!
//! let mut items = LineItemStore::new();
//! items.add("Pintura", "50000").unwrap();
//! items.add("Latonería", "").unwrap();
//!
//! let client = ClientRecord::new("Juan Perez", "", "123");
//! let date = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
//!
//! let doc = DocumentComposer::default()
//!     .compose(&client, items.items(), &QuotationNumber::new(2), date)
//!     .unwrap();
//!
//! assert_eq!(doc.item_table().unwrap().total.value, "$ 50.000");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod document;
pub mod error;
pub mod line_items;
pub mod money;
pub mod template;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use document::{Block, Document, DocumentComposer, ImageRef};
pub use error::{ValidationError, ValidationResult};
pub use line_items::LineItemStore;
pub use money::{CurrencyFormat, Money};
pub use template::{suggested_file_name, CompanyProfile};
pub use types::*;
