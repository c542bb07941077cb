use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage backend failure: {0}")]
    Backend(#[from] sled::Error),

    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage quota exceeded: {required} bytes required, limit is {limit} bytes")]
    QuotaExceeded { required: usize, limit: usize },

    #[error("Corrupt entry under '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    #[error("Failed to serialize page set '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}
