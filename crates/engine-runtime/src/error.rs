use connectors::error::NetworkError;
use engine_core::error::StorageError;
use engine_processing::error::EngineError;
use model::catalog::field::Field;
use thiserror::Error;

/// Errors surfaced by catalogue operations.
#[derive(Debug, Error)]
pub enum CatalogueError {
    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    /// The filters matched nothing; the previously active set is kept.
    #[error("No breeds match the current filters")]
    EmptyResult,

    #[error("No breed found with id '{0}'")]
    BreedNotFound(String),

    /// The field already has a row in the filter form.
    #[error("Field '{0}' is already used in this form")]
    FieldInUse(Field),

    #[error("Filter row {0} does not exist")]
    NoSuchRow(usize),
}
