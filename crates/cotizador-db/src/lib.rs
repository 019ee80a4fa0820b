//! # cotizador-db: Persistence for Cotizador
//!
//! The only durable state of the application is the quotation counter.
//! This crate stores it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  QuotationGenerator (cli)                                              │
//! │       │ counter.issue()                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   cotizador-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────────────┐    ┌────────────────┐   ┌─────────────┐  │   │
//! │  │   │ SequenceCounter │───►│ KeyValueStore  │   │ Migrations  │  │   │
//! │  │   │ (sequence.rs)   │    │  (store.rs)    │   │ (embedded)  │  │   │
//! │  │   └─────────────────┘    └───────┬────────┘   └─────────────┘  │   │
//! │  │                          ┌───────┴───────────┐                  │   │
//! │  │                  SettingsRepository     MemoryStore             │   │
//! │  └──────────────────────────┬──────────────────────────────────────┘   │
//! │                             ▼                                           │
//! │                  SQLite: app_meta(key, value, updated_at)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use cotizador_db::{Database, DbConfig, SequenceCounter};
//!
//! let db = Database::new(DbConfig::new("cotizador.db")).await?;
//! let mut counter = SequenceCounter::new(db.settings());
//! let number = counter.issue().await?; // COT-2 on a fresh database
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod sequence;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::settings::SettingsRepository;
pub use sequence::{PersistenceError, SequenceCounter, COUNTER_KEY};
pub use store::{KeyValueStore, MemoryStore};
