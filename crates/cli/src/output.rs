use crate::error::CliError;
use engine_runtime::catalogue::FieldOptions;
use model::{
    catalog::{field::Field, operator::Operator},
    pagination::page::PageSetMeta,
    records::{
        breed::{BreedCard, BreedSummary},
        record::Record,
    },
};
use serde::Serialize;

/// One page of the active set as printed to the user.
#[derive(Debug, Serialize)]
pub struct PageView {
    pub set: String,
    pub page: usize,
    pub total_pages: usize,
    pub total_records: usize,
    pub has_next: bool,
    pub records: Vec<Record>,
}

#[derive(Debug, Serialize)]
struct FieldRow {
    name: &'static str,
    label: String,
    kind: String,
    operators: Vec<&'static str>,
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_fields(as_json: bool) -> Result<(), CliError> {
    let rows: Vec<FieldRow> = Field::ALL
        .into_iter()
        .map(|field| FieldRow {
            name: field.as_str(),
            label: field.label(),
            kind: field.kind().to_string(),
            operators: Operator::for_kind(field.kind())
                .iter()
                .map(|op| op.symbol())
                .collect(),
        })
        .collect();

    if as_json {
        return print_json(&rows);
    }

    println!("{:<20} {:<20} {:<8} Operators", "Field", "Label", "Kind");
    println!("{}", "-".repeat(64));
    for row in rows {
        println!(
            "{:<20} {:<20} {:<8} {}",
            row.name,
            row.label,
            row.kind,
            row.operators.join(" ")
        );
    }
    Ok(())
}

pub fn print_breeds(breeds: &[BreedSummary], as_json: bool) -> Result<(), CliError> {
    if as_json {
        return print_json(breeds);
    }

    for breed in breeds {
        println!("{:<6} {}", breed.id, breed.name);
    }
    println!("{} breeds", breeds.len());
    Ok(())
}

pub fn print_card(card: &BreedCard, as_json: bool) -> Result<(), CliError> {
    if as_json {
        return print_json(card);
    }

    println!("{}", card.name);
    println!("{}", "=".repeat(card.name.len()));
    println!("{:<14} {}", "Temperament", card.temperament.as_deref().unwrap_or("n/a"));
    println!("{:<14} {}", "Image", card.image_url.as_deref().unwrap_or("n/a"));
    if let Some(description) = &card.description {
        println!();
        println!("{description}");
    }
    Ok(())
}

/// Prints a page as breed cards. `columns` are shown under each card's
/// heading.
pub fn print_page(view: &PageView, columns: &[Field], as_json: bool) -> Result<(), CliError> {
    if as_json {
        return print_json(view);
    }

    println!(
        "Page {}/{} of '{}' ({} breeds)",
        view.page + 1,
        view.total_pages.max(1),
        view.set,
        view.total_records
    );
    println!("-----------------------------");

    for record in &view.records {
        for line in card_lines(record, columns) {
            println!("{line}");
        }
        println!();
    }

    if view.has_next {
        println!("(more with --page {})", view.page + 1);
    }
    Ok(())
}

fn card_lines(record: &Record, columns: &[Field]) -> Vec<String> {
    let card = BreedCard::from_breed(record);
    let mut lines = vec![format!("{} ({})", card.name, record.id().unwrap_or("-"))];

    if !columns.is_empty() {
        let values: Vec<String> = columns
            .iter()
            .map(|field| format!("{} {}", field.as_str(), record.value(field.as_str())))
            .collect();
        lines.push(format!("  {}", values.join(", ")));
    }
    lines.push(format!(
        "  {:<12} {}",
        "Temperament",
        card.temperament.as_deref().unwrap_or("n/a")
    ));
    lines.push(format!(
        "  {:<12} {}",
        "Image",
        card.image_url.as_deref().unwrap_or("n/a")
    ));
    if let Some(description) = card.description {
        lines.push(format!("  {description}"));
    }
    lines
}

pub fn print_options(options: &FieldOptions, as_json: bool) -> Result<(), CliError> {
    if as_json {
        return print_json(options);
    }

    let operators: Vec<&str> = options.operators.iter().map(|op| op.symbol()).collect();
    let values: Vec<String> = options.values.iter().map(i64::to_string).collect();

    println!("{:<12} {}", "Field", options.field.label());
    println!("{:<12} {}", "Kind", options.field.kind());
    println!("{:<12} {}", "Operators", operators.join(" "));
    println!("{:<12} {}", "Values", values.join(" "));
    Ok(())
}

pub fn print_refresh(meta: &PageSetMeta, as_json: bool) -> Result<(), CliError> {
    if as_json {
        return print_json(meta);
    }

    println!(
        "Cached {} breeds in {} pages",
        meta.total_records, meta.total_pages
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_card_lines_show_breed_and_columns() {
        let record = Record::try_from(json!({
            "id": "kora",
            "name": "Korat",
            "temperament": "Active, Loyal",
            "description": "A silver-blue cat.",
            "reference_image_id": "DbwiefiaY",
            "rare": 1,
            "energy_level": 3
        }))
        .unwrap();

        let lines = card_lines(&record, &[Field::Rare, Field::EnergyLevel]);
        assert_eq!(lines[0], "Korat (kora)");
        assert_eq!(lines[1], "  rare 1, energy_level 3");
        assert!(lines[2].ends_with("Active, Loyal"));
        assert!(lines[3].ends_with("https://cdn2.thecatapi.com/images/DbwiefiaY.jpg"));
        assert_eq!(lines[4], "  A silver-blue cat.");
    }

    #[test]
    fn test_card_lines_without_extras() {
        let record = Record::try_from(json!({"id": "x", "name": "Plain"})).unwrap();
        let lines = card_lines(&record, &[]);
        assert_eq!(lines.len(), 3);
        assert!(lines[2].ends_with("n/a"));
    }
}
