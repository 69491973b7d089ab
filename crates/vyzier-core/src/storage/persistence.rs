//! Persistence adapter trait.
//!
//! Defines the interface for durable per-client key-value storage.
//! Implementations live in vyzier-infra (SQLite) and in this crate
//! (in-memory).

use vyzier_types::error::PersistenceError;

/// Trait for durable key-value storage of JSON values.
///
/// `save` is an upsert: saving the same value twice leaves the store in the
/// same state as saving it once. Values must come back from `load_raw`
/// exactly as saved (array order and string contents unchanged).
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait PersistenceAdapter: Send + Sync {
    /// Write a value under a key, replacing any previous value.
    fn save(
        &self,
        key: &str,
        value: &serde_json::Value,
    ) -> impl std::future::Future<Output = Result<(), PersistenceError>> + Send;

    /// Read the value stored under a key. Returns None if the key does not exist.
    fn load_raw(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<serde_json::Value>, PersistenceError>> + Send;

    /// Delete a key. No-op if the key does not exist.
    fn remove(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<(), PersistenceError>> + Send;
}
