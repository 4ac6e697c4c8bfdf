//! Ordered column schema

use super::Column;
use super::FilterKind;
use crate::error::SchemaError;

/// The ordered list of columns that shapes the table.
///
/// Column names are unique; [`Schema::push`] refuses a second column with an
/// existing name, so plugin extensions cannot make cell lookup ambiguous.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    columns: Vec<Column>,
}

impl Schema {
    /// Starts a validated schema.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Builds a schema from columns, validating them.
    pub fn from_columns(columns: impl IntoIterator<Item = Column>) -> Result<Self, SchemaError> {
        columns
            .into_iter()
            .fold(Self::builder(), SchemaBuilder::column)
            .build()
    }

    /// Appends a column.
    pub fn push(&mut self, column: Column) -> Result<(), SchemaError> {
        validate(&column)?;
        if self.contains(&column.name) {
            return Err(SchemaError::duplicate(column.name));
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Column> {
        self.columns.iter()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// The `--columns` grid template built from each column's width.
    pub fn template(&self) -> String {
        self.columns.iter().map(Column::width).collect::<Vec<_>>().join(" ")
    }
}

impl<'a> IntoIterator for &'a Schema {
    type Item = &'a Column;
    type IntoIter = std::slice::Iter<'a, Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.columns.iter()
    }
}

/// Builder that validates the schema once, at construction time.
///
/// # Example
///
/// ```
/// use salesgrid_lib::model::{Column, FilterKind, Schema};
///
/// let schema = Schema::builder()
///     .column(Column::new("date", "Date").sortable())
///     .column(Column::new("seller", "Seller").filter(FilterKind::Select).options("sellers"))
///     .build()
///     .unwrap();
/// assert_eq!(schema.names(), vec!["date", "seller"]);
///
/// let dup = Schema::builder()
///     .column(Column::new("date", "Date"))
///     .column(Column::new("date", "Again"))
///     .build();
/// assert!(dup.is_err());
/// ```
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    columns: Vec<Column>,
}

impl SchemaBuilder {
    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn build(self) -> Result<Schema, SchemaError> {
        let mut schema = Schema::default();
        for column in self.columns {
            schema.push(column)?;
        }
        Ok(schema)
    }
}

fn validate(column: &Column) -> Result<(), SchemaError> {
    if column.name.trim().is_empty() {
        return Err(SchemaError::EmptyName);
    }
    if column.filter == Some(FilterKind::Select) && column.options.is_none() {
        return Err(SchemaError::SelectWithoutOptions {
            column: column.name.clone(),
        });
    }
    Ok(())
}
