use crate::error::StorageError;

pub mod memory;
pub mod sled_store;

/// Whole-value string store backing the page cache.
///
/// Reads and writes always move a complete value; there are no partial
/// updates. Implementations are synchronous.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}
