use engine_config::error::ConfigError;
use engine_core::error::StorageError;
use engine_runtime::error::CatalogueError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Settings(#[from] ConfigError),

    #[error("Failed to open the cache: {0}")]
    Store(#[from] StorageError),

    #[error(transparent)]
    Catalogue(#[from] CatalogueError),

    #[error("Background task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("Page {page} does not exist ({total_pages} pages available)")]
    PageOutOfRange { page: usize, total_pages: usize },
}
