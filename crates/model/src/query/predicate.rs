use crate::{
    catalog::{field::Field, operator::Operator},
    error::ParseError,
};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A single `field <op> value` test. The value stays textual until the
/// predicate is compiled against the field's declared kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub field: Field,
    pub operator: Operator,
    pub value: String,
}

impl Predicate {
    pub fn new(field: Field, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            field,
            operator,
            value: value.into(),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.operator, self.value)
    }
}

const OPERATOR_CHARS: [char; 4] = ['<', '>', '=', '!'];

/// Parses the compact form `adaptability>=4` (whitespace around the
/// operator is allowed).
impl FromStr for Predicate {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseError::MalformedPredicate(s.to_string());

        let op_start = s.find(OPERATOR_CHARS).ok_or_else(malformed)?;
        let rest = &s[op_start..];
        let op_len = rest
            .find(|c: char| !OPERATOR_CHARS.contains(&c))
            .unwrap_or(rest.len());

        let field = s[..op_start].trim();
        let operator = &rest[..op_len];
        let value = rest[op_len..].trim();

        if field.is_empty() || value.is_empty() {
            return Err(malformed());
        }

        Ok(Predicate {
            field: field.parse()?,
            operator: operator.parse()?,
            value: value.to_string(),
        })
    }
}
