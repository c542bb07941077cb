use super::Filter;
use crate::error::EngineError;
use model::{
    catalog::{
        field::{Field, FieldKind},
        operator::Operator,
    },
    core::value::Value,
    query::predicate::Predicate,
    records::record::Record,
};

/// Comparison with its right-hand side already coerced to the field's kind.
#[derive(Debug, Clone, PartialEq)]
enum Test {
    Number { op: Operator, rhs: f64 },
    Flag { negate: bool, rhs: bool },
}

/// A predicate validated against the field catalog.
///
/// Operator and literal are checked once here; evaluation is a plain match
/// over the pre-coerced comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPredicate {
    field: Field,
    test: Test,
}

impl CompiledPredicate {
    pub fn compile(predicate: &Predicate) -> Result<Self, EngineError> {
        let Predicate {
            field,
            operator,
            value,
        } = predicate;
        let kind = field.kind();

        if !operator.supports(kind) {
            return Err(EngineError::InvalidPredicate(format!(
                "operator '{operator}' cannot be applied to {kind} field '{field}'"
            )));
        }

        let literal = Value::String(value.clone());
        let test = match kind {
            FieldKind::Numeric => {
                let rhs = literal
                    .as_f64()
                    .filter(|n| n.is_finite())
                    .ok_or_else(|| not_coercible(*field, kind, value))?;
                Test::Number { op: *operator, rhs }
            }
            FieldKind::Boolean => {
                let rhs = literal
                    .as_bool()
                    .ok_or_else(|| not_coercible(*field, kind, value))?;
                Test::Flag {
                    negate: *operator == Operator::NotEqual,
                    rhs,
                }
            }
        };

        Ok(Self {
            field: *field,
            test,
        })
    }

    pub fn field(&self) -> Field {
        self.field
    }
}

impl Filter for CompiledPredicate {
    fn should_keep(&self, record: &Record) -> bool {
        let actual = record.value(self.field.as_str());

        match self.test {
            Test::Number { op, rhs } => match actual.as_f64().filter(|v| v.is_finite()) {
                Some(lhs) => compare_numbers(op, lhs, rhs),
                None => false,
            },
            Test::Flag { negate, rhs } => match actual.as_bool() {
                Some(lhs) => (lhs == rhs) != negate,
                None => false,
            },
        }
    }
}

fn compare_numbers(op: Operator, l: f64, r: f64) -> bool {
    match op {
        Operator::GreaterThan => l > r,
        Operator::LessThan => l < r,
        Operator::Equal => (l - r).abs() < f64::EPSILON,
        Operator::LessOrEqual => l <= r,
        Operator::GreaterOrEqual => l >= r,
        Operator::NotEqual => (l - r).abs() >= f64::EPSILON,
    }
}

fn not_coercible(field: Field, kind: FieldKind, value: &str) -> EngineError {
    EngineError::InvalidPredicate(format!(
        "value '{value}' is not a valid {kind} literal for field '{field}'"
    ))
}
