//! Durable-storage port for the cart store.
//!
//! The cart persists its snapshot through this abstraction instead of an
//! ambient global, so hosts can plug in whatever key-value storage the
//! platform provides and tests can use the in-memory implementation.

use std::collections::HashMap;
use std::sync::Mutex;
use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to read a key.
    #[error("storage read failed: {0}")]
    Read(String),

    /// Failed to write a key.
    #[error("storage write failed: {0}")]
    Write(String),

    /// Failed to serialize/deserialize a stored snapshot.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Simple get/set/remove by string key, synchronous, best-effort.
///
/// There is no transactional guarantee across keys. Storage is a cache of
/// the cart, not the authority; callers treat every operation as fallible
/// and non-fatal.
pub trait StoragePort: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, overwriting any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key` entirely. Removing a missing key is a no-op.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage, used by tests and as a default for hosts without
/// durable storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl StoragePort for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Read(e.to_string()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Write(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| StorageError::Write(e.to_string()))?;
        entries.remove(key);
        Ok(())
    }
}
