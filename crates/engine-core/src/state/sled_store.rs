use crate::{error::StorageError, state::KvStore};
use std::path::Path;

pub struct SledKvStore {
    db: sled::Db,
}

impl SledKvStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let db = sled::open(path)?;
        Ok(Self { db })
    }
}

impl KvStore for SledKvStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.db.get(key)? {
            Some(bytes) => String::from_utf8(bytes.to_vec())
                .map(Some)
                .map_err(|e| StorageError::Corrupt {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.db.insert(key, value.as_bytes())?;
        // The CLI is short lived; make the write durable before returning.
        self.db.flush()?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.db.remove(key)?;
        self.db.flush()?;
        Ok(())
    }
}
