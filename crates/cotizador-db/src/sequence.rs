//! # Sequence Counter
//!
//! Issues quotation numbers that are never reused, across restarts.
//!
//! ## Issue Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         counter.issue()                                 │
//! │                                                                         │
//! │  cached? ──no──► store.get("counter") ──► absent / junk / < 1 → 1       │
//! │     │                     │                                             │
//! │     │                     └── read error → PersistenceError::Read       │
//! │     ▼                                                                   │
//! │  next = current + 1 ──────────────────── overflow → Exhausted           │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  store.set("counter", next) ───────────── error → PersistenceError::Write│
//! │     │                                     (cache untouched)             │
//! │     ▼                                                                   │
//! │  cache = next, return COT-<next>                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The implicit starting value is 1, so the first number ever issued is 2.
//! Nothing is written until the first successful `next`.
//!
//! Callers issue a number before rendering. A render failure after `next`
//! leaves a gap in the sequence; the number is not rolled back.

use thiserror::Error;
use tracing::{debug, info, warn};

use cotizador_core::QuotationNumber;

use crate::error::DbError;
use crate::store::KeyValueStore;

/// Store key holding the last issued number.
pub const COUNTER_KEY: &str = "counter";

/// Value assumed when nothing valid is stored.
pub const INITIAL_VALUE: u64 = 1;

/// Counter persistence failures. The cached value never moves on error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Could not read the quotation counter: {0}")]
    Read(#[source] DbError),

    #[error("Could not save quotation counter value {value}: {source}")]
    Write {
        value: u64,
        #[source]
        source: DbError,
    },

    #[error("Quotation counter is exhausted at {current}")]
    Exhausted { current: u64 },
}

/// Persisted, strictly increasing counter.
#[derive(Debug)]
pub struct SequenceCounter<S> {
    store: S,
    cached: Option<u64>,
}

impl<S: KeyValueStore> SequenceCounter<S> {
    /// Wraps a store. Nothing is read until the counter is first used.
    pub fn new(store: S) -> Self {
        SequenceCounter {
            store,
            cached: None,
        }
    }

    /// Reads the persisted value.
    ///
    /// Absent, non-numeric and values below 1 all load as 1; the store is not
    /// written.
    pub async fn load(&self) -> Result<u64, PersistenceError> {
        let raw = self
            .store
            .get(COUNTER_KEY)
            .await
            .map_err(PersistenceError::Read)?;

        let Some(raw) = raw else {
            debug!("No stored counter, starting at {}", INITIAL_VALUE);
            return Ok(INITIAL_VALUE);
        };

        match raw.trim().parse::<u64>() {
            Ok(value) if value >= INITIAL_VALUE => Ok(value),
            Ok(value) => {
                warn!(value = value, "Stored counter below {}, using {}", INITIAL_VALUE, INITIAL_VALUE);
                Ok(INITIAL_VALUE)
            }
            Err(_) => {
                warn!(raw = %raw, "Stored counter is not a number, using {}", INITIAL_VALUE);
                Ok(INITIAL_VALUE)
            }
        }
    }

    /// Current value, loading it on first use.
    pub async fn current(&mut self) -> Result<u64, PersistenceError> {
        if let Some(value) = self.cached {
            return Ok(value);
        }

        let value = self.load().await?;
        self.cached = Some(value);
        Ok(value)
    }

    /// Advances the counter by one and persists it.
    ///
    /// Returns only after the store accepted the write. On error the cached
    /// value is unchanged and no number has been issued.
    pub async fn next(&mut self) -> Result<u64, PersistenceError> {
        let current = self.current().await?;
        let next = current
            .checked_add(1)
            .ok_or(PersistenceError::Exhausted { current })?;

        self.store
            .set(COUNTER_KEY, &next.to_string())
            .await
            .map_err(|source| PersistenceError::Write {
                value: next,
                source,
            })?;

        self.cached = Some(next);
        info!(counter = next, "Quotation counter advanced");
        Ok(next)
    }

    /// Advances the counter and returns it as a quotation number (`COT-<n>`).
    pub async fn issue(&mut self) -> Result<QuotationNumber, PersistenceError> {
        self.next().await.map(QuotationNumber::new)
    }

    /// Number the next `issue` would return, without issuing it.
    pub async fn peek_next(&mut self) -> Result<QuotationNumber, PersistenceError> {
        let current = self.current().await?;
        current
            .checked_add(1)
            .map(QuotationNumber::new)
            .ok_or(PersistenceError::Exhausted { current })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn test_fresh_counter_issues_two_through_n_plus_one() {
        let store = MemoryStore::new();
        let mut counter = SequenceCounter::new(store.clone());

        assert_eq!(counter.load().await.unwrap(), 1);
        assert_eq!(store.peek(COUNTER_KEY).await, None);

        let mut issued = Vec::new();
        for _ in 0..5 {
            issued.push(counter.next().await.unwrap());
        }

        assert_eq!(issued, [2, 3, 4, 5, 6]);
        assert_eq!(store.peek(COUNTER_KEY).await.as_deref(), Some("6"));
    }

    #[tokio::test]
    async fn test_issue_formats_label() {
        let mut counter = SequenceCounter::new(MemoryStore::new());
        assert_eq!(counter.issue().await.unwrap().to_string(), "COT-2");
    }

    #[tokio::test]
    async fn test_malformed_values_load_as_one() {
        for raw in ["abc", "", "-4", "0", "1.5"] {
            let counter = SequenceCounter::new(MemoryStore::with_value(COUNTER_KEY, raw));
            assert_eq!(counter.load().await.unwrap(), 1, "raw value {:?}", raw);
        }

        let counter = SequenceCounter::new(MemoryStore::with_value(COUNTER_KEY, " 41 "));
        assert_eq!(counter.load().await.unwrap(), 41);
    }

    #[tokio::test]
    async fn test_failed_write_does_not_advance() {
        let store = MemoryStore::with_value(COUNTER_KEY, "7");
        let mut counter = SequenceCounter::new(store.clone());

        store.fail_writes(true);
        let err = counter.next().await.unwrap_err();
        assert!(matches!(err, PersistenceError::Write { value: 8, .. }));
        assert_eq!(counter.current().await.unwrap(), 7);
        assert_eq!(store.peek(COUNTER_KEY).await.as_deref(), Some("7"));

        store.fail_writes(false);
        assert_eq!(counter.next().await.unwrap(), 8);
    }

    #[tokio::test]
    async fn test_read_failure_propagates() {
        let store = MemoryStore::with_value(COUNTER_KEY, "7");
        store.fail_reads(true);

        let mut counter = SequenceCounter::new(store);
        assert!(matches!(counter.next().await, Err(PersistenceError::Read(_))));
    }

    #[tokio::test]
    async fn test_exhausted_counter() {
        let store = MemoryStore::with_value(COUNTER_KEY, &u64::MAX.to_string());
        let mut counter = SequenceCounter::new(store.clone());

        assert!(matches!(
            counter.next().await,
            Err(PersistenceError::Exhausted { current: u64::MAX })
        ));
        assert!(counter.peek_next().await.is_err());
    }

    #[tokio::test]
    async fn test_peek_next_does_not_write() {
        let store = MemoryStore::new();
        let mut counter = SequenceCounter::new(store.clone());

        assert_eq!(counter.peek_next().await.unwrap().value(), 2);
        assert_eq!(store.peek(COUNTER_KEY).await, None);
        assert_eq!(counter.issue().await.unwrap().value(), 2);
    }

    #[tokio::test]
    async fn test_counter_survives_restart() {
        let store = MemoryStore::new();
        {
            let mut counter = SequenceCounter::new(store.clone());
            counter.next().await.unwrap();
            counter.next().await.unwrap();
        }

        let mut restarted = SequenceCounter::new(store);
        assert_eq!(restarted.current().await.unwrap(), 3);
        assert_eq!(restarted.next().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_sqlite_counter_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cotizador.db");

        {
            let db = Database::new(DbConfig::new(&path)).await.unwrap();
            let mut counter = SequenceCounter::new(db.settings());
            assert_eq!(counter.issue().await.unwrap().label(), "COT-2");
            assert_eq!(counter.issue().await.unwrap().label(), "COT-3");
            db.close().await;
        }

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        let mut counter = SequenceCounter::new(db.settings());
        assert_eq!(counter.issue().await.unwrap().label(), "COT-4");
    }
}
