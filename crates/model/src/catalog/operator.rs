use crate::{catalog::field::FieldKind, error::ParseError};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Comparison operators available to filter predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    GreaterThan,
    LessThan,
    Equal,
    LessOrEqual,
    GreaterOrEqual,
    NotEqual,
}

impl Operator {
    pub const NUMERIC: [Operator; 6] = [
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::Equal,
        Operator::LessOrEqual,
        Operator::GreaterOrEqual,
        Operator::NotEqual,
    ];

    pub const BOOLEAN: [Operator; 2] = [Operator::Equal, Operator::NotEqual];

    /// Operators offered for a field of the given kind.
    pub fn for_kind(kind: FieldKind) -> &'static [Operator] {
        match kind {
            FieldKind::Numeric => &Self::NUMERIC,
            FieldKind::Boolean => &Self::BOOLEAN,
        }
    }

    pub fn supports(self, kind: FieldKind) -> bool {
        Self::for_kind(kind).contains(&self)
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Operator::GreaterThan => ">",
            Operator::LessThan => "<",
            Operator::Equal => "==",
            Operator::LessOrEqual => "<=",
            Operator::GreaterOrEqual => ">=",
            Operator::NotEqual => "!=",
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Operator {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            ">" => Ok(Operator::GreaterThan),
            "<" => Ok(Operator::LessThan),
            "=" | "==" | "===" => Ok(Operator::Equal),
            "<=" => Ok(Operator::LessOrEqual),
            ">=" => Ok(Operator::GreaterOrEqual),
            "!=" | "!==" => Ok(Operator::NotEqual),
            other => Err(ParseError::UnknownOperator(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_display() {
        assert_eq!(format!("{}", Operator::Equal), "==");
        assert_eq!(format!("{}", Operator::GreaterOrEqual), ">=");
    }

    #[test]
    fn test_strict_equality_aliases() {
        assert_eq!("===".parse::<Operator>(), Ok(Operator::Equal));
        assert_eq!("!==".parse::<Operator>(), Ok(Operator::NotEqual));
        assert!("=>".parse::<Operator>().is_err());
    }

    #[test]
    fn test_boolean_fields_only_support_equality() {
        assert!(Operator::Equal.supports(FieldKind::Boolean));
        assert!(Operator::NotEqual.supports(FieldKind::Boolean));
        assert!(!Operator::LessThan.supports(FieldKind::Boolean));
        assert!(Operator::NUMERIC.iter().all(|op| op.supports(FieldKind::Numeric)));
    }
}
