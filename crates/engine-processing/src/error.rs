use model::{catalog::field::Field, error::ParseError};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("Invalid predicate: {0}")]
    InvalidPredicate(String),

    #[error("No values for '{field}': the record collection is empty")]
    EmptyCollection { field: Field },
}

impl From<ParseError> for EngineError {
    fn from(err: ParseError) -> Self {
        EngineError::InvalidPredicate(err.to_string())
    }
}
