//! `cotizador counter`

use std::io::Write;

use crate::error::AppError;
use crate::state::DbState;

/// Prints the stored counter and the next number. Never writes the store.
pub async fn run(db: &DbState, out: &mut impl Write) -> Result<(), AppError> {
    let mut counter = db.counter();
    let current = counter.current().await?;
    let next = counter.peek_next().await?;

    writeln!(out, "Current: {}", current)?;
    writeln!(out, "Next: {}", next)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cotizador_db::{MemoryStore, COUNTER_KEY};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_counter_output() {
        let store = MemoryStore::with_value(COUNTER_KEY, "7");
        let db = DbState::with_store(Arc::new(store.clone()));

        let mut out = Vec::new();
        run(&db, &mut out).await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Current: 7\nNext: COT-8\n");
        assert_eq!(store.peek(COUNTER_KEY).await.as_deref(), Some("7"));
    }

    #[tokio::test]
    async fn test_fresh_store() {
        let store = MemoryStore::new();
        let db = DbState::with_store(Arc::new(store.clone()));

        let mut out = Vec::new();
        run(&db, &mut out).await.unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "Current: 1\nNext: COT-2\n");
        assert_eq!(store.peek(COUNTER_KEY).await, None);
    }
}
