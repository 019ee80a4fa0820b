//! # State Module
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │  QuotationForm   │  │   ConfigState    │  │      DbState         │  │
//! │  │                  │  │                  │  │                      │  │
//! │  │  client fields   │  │  paths, format   │  │  counter store       │  │
//! │  │  draft item      │  │  currency        │  │  (SQLite or memory)  │  │
//! │  │  LineItemStore   │  │  company profile │  │                      │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │   per quotation          read-only             outlives quotations     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod db;
mod form;

pub use config::{
    ConfigError, ConfigFile, ConfigOverrides, ConfigState, CounterStorage, PathsSection,
    ENV_ASSET_DIR, ENV_DB_PATH, ENV_FORMAT, ENV_OUTPUT_DIR,
};
pub use db::{DbState, SharedStore};
pub use form::QuotationForm;
