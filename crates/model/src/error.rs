use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("Unknown sort direction '{0}'")]
    UnknownDirection(String),

    #[error("Malformed predicate '{0}' (expected <field><op><value>)")]
    MalformedPredicate(String),
}
