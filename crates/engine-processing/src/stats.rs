use crate::{error::EngineError, sort::sort_key};
use model::{catalog::field::Field, records::record::Record};
use serde::Serialize;

/// Smallest and largest value of a field over a collection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

/// Bounds of `field` over `records`. Records without a usable value are
/// skipped; if none is left the collection counts as empty.
pub fn min_max(field: Field, records: &[Record]) -> Result<Bounds, EngineError> {
    records
        .iter()
        .filter_map(|record| sort_key(field, record))
        .fold(None, |acc: Option<Bounds>, v| match acc {
            None => Some(Bounds { min: v, max: v }),
            Some(b) => Some(Bounds {
                min: b.min.min(v),
                max: b.max.max(v),
            }),
        })
        .ok_or(EngineError::EmptyCollection { field })
}

/// Upper bound on the number of choices [`value_options`] will list.
pub const MAX_VALUE_OPTIONS: i64 = 100;

/// Whole-number choices offered for `field`, from its minimum to its
/// maximum inclusive. A range wider than [`MAX_VALUE_OPTIONS`] is rejected.
pub fn value_options(field: Field, records: &[Record]) -> Result<Vec<i64>, EngineError> {
    let Bounds { min, max } = min_max(field, records)?;
    let (low, high) = (min.ceil(), max.floor());

    if high - low >= MAX_VALUE_OPTIONS as f64 {
        return Err(EngineError::InvalidPredicate(format!(
            "'{field}' spans {min}..{max}, more than {MAX_VALUE_OPTIONS} values"
        )));
    }
    Ok((low as i64..=high as i64).collect())
}
