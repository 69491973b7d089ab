//! In-memory persistence adapter.
//!
//! Backs ephemeral sessions and tests. Clones share the same underlying map,
//! so a test can keep a handle while a controller owns another. Read and
//! write failures can be switched on to exercise error paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use vyzier_types::error::PersistenceError;

use super::persistence::PersistenceAdapter;

#[derive(Debug, Default)]
struct Inner {
    entries: Mutex<HashMap<String, serde_json::Value>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

/// `HashMap`-backed implementation of `PersistenceAdapter`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersistence {
    inner: Arc<Inner>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `load_raw` fail.
    pub fn fail_reads(&self, fail: bool) {
        self.inner.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `save` and `remove` fail.
    pub fn fail_writes(&self, fail: bool) {
        self.inner.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful `save` calls so far.
    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Store a value directly, bypassing failure injection.
    pub fn insert_raw(&self, key: &str, value: serde_json::Value) {
        self.entries().insert(key.to_string(), value);
    }

    /// Read a value directly, bypassing failure injection.
    pub fn get_raw(&self, key: &str) -> Option<serde_json::Value> {
        self.entries().get(key).cloned()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, serde_json::Value>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn check_writable(&self) -> Result<(), PersistenceError> {
        if self.inner.fail_writes.load(Ordering::SeqCst) {
            return Err(PersistenceError::Connection(
                "in-memory store rejected write".to_string(),
            ));
        }
        Ok(())
    }
}

impl PersistenceAdapter for InMemoryPersistence {
    async fn save(&self, key: &str, value: &serde_json::Value) -> Result<(), PersistenceError> {
        self.check_writable()?;
        self.entries().insert(key.to_string(), value.clone());
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load_raw(&self, key: &str) -> Result<Option<serde_json::Value>, PersistenceError> {
        if self.inner.fail_reads.load(Ordering::SeqCst) {
            return Err(PersistenceError::Connection(
                "in-memory store rejected read".to_string(),
            ));
        }
        Ok(self.entries().get(key).cloned())
    }

    async fn remove(&self, key: &str) -> Result<(), PersistenceError> {
        self.check_writable()?;
        self.entries().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_save_and_load() {
        let store = InMemoryPersistence::new();
        store.save("k", &json!([1, 2, 3])).await.unwrap();
        assert_eq!(store.load_raw("k").await.unwrap(), Some(json!([1, 2, 3])));
        assert_eq!(store.load_raw("missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_save_is_idempotent_upsert() {
        let store = InMemoryPersistence::new();
        store.save("k", &json!("a")).await.unwrap();
        store.save("k", &json!("a")).await.unwrap();
        assert_eq!(store.load_raw("k").await.unwrap(), Some(json!("a")));
        assert_eq!(store.write_count(), 2);
    }

    #[tokio::test]
    async fn test_remove() {
        let store = InMemoryPersistence::new();
        store.save("k", &json!(1)).await.unwrap();
        store.remove("k").await.unwrap();
        store.remove("k").await.unwrap();
        assert_eq!(store.load_raw("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clones_share_entries() {
        let store = InMemoryPersistence::new();
        let handle = store.clone();
        store.save("k", &json!(true)).await.unwrap();
        assert_eq!(handle.get_raw("k"), Some(json!(true)));
    }

    #[tokio::test]
    async fn test_failure_injection() {
        let store = InMemoryPersistence::new();
        store.fail_writes(true);
        assert!(store.save("k", &json!(1)).await.is_err());
        assert_eq!(store.write_count(), 0);

        store.fail_writes(false);
        store.fail_reads(true);
        store.save("k", &json!(1)).await.unwrap();
        assert!(store.load_raw("k").await.is_err());
    }
}
