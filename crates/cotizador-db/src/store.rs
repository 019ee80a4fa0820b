//! # Key/Value Store
//!
//! The one storage capability the sequence counter needs: read a string by
//! key, write a string by key.
//!
//! ```text
//! ┌──────────────────────┐        ┌─────────────────────────────────────┐
//! │  SequenceCounter<S>  │──────► │  S: KeyValueStore                   │
//! └──────────────────────┘        │   ├── SettingsRepository (SQLite)   │
//! │                               │   └── MemoryStore (tests, failures) │
//!                                 └─────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::{DbError, DbResult};

/// Durable string storage keyed by name.
///
/// `set` must only return `Ok` once the value is durable.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value for `key`; `Ok(None)` when absent.
    async fn get(&self, key: &str) -> DbResult<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> DbResult<()>;
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        (**self).set(key, value).await
    }
}

// =============================================================================
// In-Memory Store
// =============================================================================

/// Process-local store.
///
/// Clones share the same map, so a clone handed to a second counter behaves
/// like the same database seen after a restart. Reads and writes can be made
/// to fail on demand.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that already holds `key = value`.
    pub fn with_value(key: &str, value: &str) -> Self {
        let mut map = HashMap::new();
        map.insert(key.to_string(), value.to_string());
        MemoryStore {
            values: Arc::new(Mutex::new(map)),
            ..Self::default()
        }
    }

    /// Makes every following `get` fail (or succeed again).
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every following `set` fail (or succeed again).
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Raw value currently stored, bypassing failure injection.
    pub async fn peek(&self, key: &str) -> Option<String> {
        self.values.lock().await.get(key).cloned()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> DbResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable(format!("read of '{}' refused", key)));
        }
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> DbResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DbError::Unavailable(format!("write of '{}' refused", key)));
        }
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
