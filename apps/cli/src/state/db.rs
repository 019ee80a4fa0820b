//! # Counter Store State
//!
//! Opens the store behind the quotation counter, as configured.
//!
//! ```text
//! CounterStorage::File(path) ──► Database (SQLite, WAL) ──► SettingsRepository
//! CounterStorage::Memory     ──► MemoryStore (gone when the process exits)
//! ```

use std::sync::Arc;
use tracing::{info, warn};

use cotizador_db::{Database, DbConfig, DbResult, KeyValueStore, MemoryStore, SequenceCounter};

use super::config::CounterStorage;

/// Shared handle to whichever store backs the counter.
pub type SharedStore = Arc<dyn KeyValueStore>;

pub struct DbState {
    store: SharedStore,
    database: Option<Database>,
}

impl DbState {
    /// Opens the configured store, running migrations for SQLite.
    pub async fn open(storage: &CounterStorage) -> DbResult<Self> {
        match storage {
            CounterStorage::File(path) => {
                let database = Database::new(DbConfig::new(path)).await?;
                Ok(DbState {
                    store: Arc::new(database.settings()),
                    database: Some(database),
                })
            }
            CounterStorage::Memory => {
                warn!("Using an in-memory counter; issued numbers will not persist");
                Ok(DbState::with_store(Arc::new(MemoryStore::new())))
            }
        }
    }

    /// Wraps an existing store.
    pub fn with_store(store: SharedStore) -> Self {
        DbState {
            store,
            database: None,
        }
    }

    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    /// A counter over this store. Nothing is read until it is used.
    pub fn counter(&self) -> SequenceCounter<SharedStore> {
        SequenceCounter::new(self.store())
    }

    /// Closes the SQLite pool, if any.
    pub async fn close(&self) {
        if let Some(database) = &self.database {
            database.close().await;
            info!("Counter store closed");
        }
    }
}
