use crate::error::CatalogueError;
use engine_processing::error::EngineError;
use model::{
    catalog::{field::Field, operator::Operator},
    query::predicate::Predicate,
};

/// One row of the filter form. Operator and value stay unset until chosen.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterRow {
    pub field: Field,
    pub operator: Option<Operator>,
    pub value: Option<String>,
}

/// Filter rows being assembled into a predicate set. Each field can be used
/// by at most one row.
#[derive(Debug, Clone, Default)]
pub struct FilterForm {
    rows: Vec<FilterRow>,
}

impl FilterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[FilterRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn used_fields(&self) -> Vec<Field> {
        self.rows.iter().map(|row| row.field).collect()
    }

    /// Fields that can still be offered for a new row, in catalog order.
    pub fn available_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| !self.rows.iter().any(|row| row.field == *field))
            .collect()
    }

    /// Adds a row for `field` and returns its index.
    pub fn add_row(&mut self, field: Field) -> Result<usize, CatalogueError> {
        if self.rows.iter().any(|row| row.field == field) {
            return Err(CatalogueError::FieldInUse(field));
        }

        self.rows.push(FilterRow {
            field,
            operator: None,
            value: None,
        });
        Ok(self.rows.len() - 1)
    }

    pub fn set_operator(&mut self, index: usize, operator: Operator) -> Result<(), CatalogueError> {
        let row = self.row_mut(index)?;
        if !operator.supports(row.field.kind()) {
            return Err(EngineError::InvalidPredicate(format!(
                "operator '{operator}' cannot be applied to {} field '{}'",
                row.field.kind(),
                row.field
            ))
            .into());
        }

        row.operator = Some(operator);
        Ok(())
    }

    pub fn set_value(&mut self, index: usize, value: impl Into<String>) -> Result<(), CatalogueError> {
        self.row_mut(index)?.value = Some(value.into());
        Ok(())
    }

    /// Adds a complete row in one step.
    pub fn push(&mut self, predicate: &Predicate) -> Result<usize, CatalogueError> {
        let index = self.add_row(predicate.field)?;
        let filled = self
            .set_operator(index, predicate.operator)
            .and_then(|_| self.set_value(index, predicate.value.clone()));

        if let Err(e) = filled {
            self.rows.pop();
            return Err(e);
        }
        Ok(index)
    }

    /// Removes a row; its field becomes available again.
    pub fn remove_row(&mut self, index: usize) -> Result<FilterRow, CatalogueError> {
        if index >= self.rows.len() {
            return Err(CatalogueError::NoSuchRow(index));
        }
        Ok(self.rows.remove(index))
    }

    pub fn reset(&mut self) {
        self.rows.clear();
    }

    /// Predicate set described by the form. Every row must be complete.
    pub fn predicates(&self) -> Result<Vec<Predicate>, CatalogueError> {
        self.rows
            .iter()
            .map(|row| match (row.operator, &row.value) {
                (Some(operator), Some(value)) => Ok(Predicate::new(row.field, operator, value.clone())),
                _ => Err(EngineError::InvalidPredicate(format!(
                    "filter on '{}' needs an operator and a value",
                    row.field
                ))
                .into()),
            })
            .collect()
    }

    fn row_mut(&mut self, index: usize) -> Result<&mut FilterRow, CatalogueError> {
        self.rows.get_mut(index).ok_or(CatalogueError::NoSuchRow(index))
    }
}
