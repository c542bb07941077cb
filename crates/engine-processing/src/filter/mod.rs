use crate::error::EngineError;
use compiler::CompiledPredicate;
use model::{query::predicate::Predicate, records::record::Record};
use tracing::debug;

pub mod compiler;

/// Decides whether a record stays in the result.
pub trait Filter {
    fn should_keep(&self, record: &Record) -> bool;
}

/// Conjunction of compiled predicates. An empty set keeps everything.
#[derive(Debug, Clone, Default)]
pub struct AllOf {
    predicates: Vec<CompiledPredicate>,
}

impl AllOf {
    /// Compiles every predicate up front so an invalid one fails the whole
    /// set before any record is inspected.
    pub fn compile(predicates: &[Predicate]) -> Result<Self, EngineError> {
        let predicates = predicates
            .iter()
            .map(CompiledPredicate::compile)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { predicates })
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }
}

impl Filter for AllOf {
    fn should_keep(&self, record: &Record) -> bool {
        self.predicates.iter().all(|p| p.should_keep(record))
    }
}

/// Returns the records for which every predicate holds, in input order.
pub fn evaluate(predicates: &[Predicate], records: Vec<Record>) -> Result<Vec<Record>, EngineError> {
    let filter = AllOf::compile(predicates)?;
    if filter.is_empty() {
        return Ok(records);
    }

    let total = records.len();
    let kept: Vec<Record> = records
        .into_iter()
        .filter(|record| filter.should_keep(record))
        .collect();

    debug!("Filter kept {} of {} records", kept.len(), total);
    Ok(kept)
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::catalog::{field::Field, operator::Operator};
    use serde_json::{Value as Json, json};

    fn breed(id: &str, adaptability: i64, hairless: i64) -> Record {
        Record::new()
            .with("id", json!(id))
            .with("adaptability", json!(adaptability))
            .with("hairless", json!(hairless))
    }

    fn ids(records: &[Record]) -> Vec<&str> {
        records.iter().filter_map(|r| r.id()).collect()
    }

    #[test]
    fn test_greater_than_keeps_matching_records() {
        let records = vec![breed("a", 2, 0), breed("b", 4, 0), breed("c", 5, 0)];
        let predicates = [Predicate::new(Field::Adaptability, Operator::GreaterThan, "3")];

        let result = evaluate(&predicates, records).unwrap();
        assert_eq!(ids(&result), vec!["b", "c"]);
    }

    #[test]
    fn test_empty_predicate_set_is_identity() {
        let records = vec![breed("a", 2, 0), breed("b", 4, 1)];
        assert_eq!(evaluate(&[], records.clone()).unwrap(), records);
    }

    #[test]
    fn test_predicates_are_anded_and_fields_may_repeat() {
        let records: Vec<Record> = (1..=5).map(|i| breed(&format!("b{i}"), i, i % 2)).collect();
        let predicates = [
            Predicate::new(Field::Adaptability, Operator::GreaterOrEqual, "2"),
            Predicate::new(Field::Adaptability, Operator::LessThan, "5"),
            Predicate::new(Field::Hairless, Operator::Equal, "true"),
        ];

        let result = evaluate(&predicates, records).unwrap();
        assert_eq!(ids(&result), vec!["b3"]);
    }

    #[test]
    fn test_result_matches_brute_force_definition() {
        let records: Vec<Record> = (0..30)
            .map(|i| breed(&format!("b{i}"), i % 6, (i / 3) % 2))
            .collect();
        let predicates = [
            Predicate::new(Field::Adaptability, Operator::NotEqual, "3"),
            Predicate::new(Field::Hairless, Operator::NotEqual, "0"),
        ];

        let expected: Vec<Record> = records
            .iter()
            .filter(|r| r.value("adaptability").as_f64() != Some(3.0))
            .filter(|r| r.value("hairless").as_bool() == Some(true))
            .cloned()
            .collect();

        assert_eq!(evaluate(&predicates, records).unwrap(), expected);
    }

    #[test]
    fn test_ordering_operator_on_boolean_field_is_rejected() {
        let predicates = [Predicate::new(Field::Hairless, Operator::LessThan, "1")];
        let err = evaluate(&predicates, vec![breed("a", 1, 0)]).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPredicate(_)));
    }

    #[test]
    fn test_invalid_predicate_fails_even_without_records() {
        let predicates = [Predicate::new(Field::Grooming, Operator::Equal, "lots")];
        assert!(matches!(
            evaluate(&predicates, Vec::new()),
            Err(EngineError::InvalidPredicate(_))
        ));
    }

    #[test]
    fn test_records_missing_the_field_never_match() {
        let mut no_field = Record::new().with("id", json!("x"));
        no_field.insert("hairless", Json::Null);
        let records = vec![no_field, breed("a", 3, 0)];

        let eq = [Predicate::new(Field::Adaptability, Operator::NotEqual, "1")];
        assert_eq!(ids(&evaluate(&eq, records.clone()).unwrap()), vec!["a"]);

        let flag = [Predicate::new(Field::Hairless, Operator::NotEqual, "1")];
        assert_eq!(ids(&evaluate(&flag, records).unwrap()), vec!["a"]);
    }

    #[test]
    fn test_no_match_yields_empty_vec() {
        let predicates = [Predicate::new(Field::Adaptability, Operator::GreaterThan, "9")];
        assert!(evaluate(&predicates, vec![breed("a", 5, 0)]).unwrap().is_empty());
    }
}
