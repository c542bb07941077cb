use model::{
    catalog::field::{Field, FieldKind},
    query::sort::{SortDirection, SortSpec},
    records::record::Record,
};
use std::cmp::Ordering;
use tracing::debug;

/// Sort key of `record` for `field`; `None` when the value is missing, not
/// of the field's kind or not finite. Booleans order as `false < true`.
pub(crate) fn sort_key(field: Field, record: &Record) -> Option<f64> {
    let value = record.value(field.as_str());
    match field.kind() {
        FieldKind::Numeric => value.as_f64().filter(|v| v.is_finite()),
        FieldKind::Boolean => value.as_bool().map(|b| if b { 1.0 } else { 0.0 }),
    }
}

/// Missing values go last whichever the direction.
fn compare_keys(a: Option<f64>, b: Option<f64>, direction: SortDirection) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = a.total_cmp(&b);
            match direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort of `records` by `field`. Ties keep their input order in both
/// directions.
pub fn sort(field: Field, direction: SortDirection, records: Vec<Record>) -> Vec<Record> {
    let mut keyed: Vec<(Option<f64>, Record)> = records
        .into_iter()
        .map(|record| (sort_key(field, &record), record))
        .collect();

    keyed.sort_by(|(a, _), (b, _)| compare_keys(*a, *b, direction));

    debug!("Sorted {} records by {} {}", keyed.len(), field, direction);
    keyed.into_iter().map(|(_, record)| record).collect()
}

pub fn sort_by_spec(spec: SortSpec, records: Vec<Record>) -> Vec<Record> {
    sort(spec.field, spec.direction, records)
}
