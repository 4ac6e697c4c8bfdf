//! Column descriptors

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use super::Record;
use crate::view::Content;

/// How a column is filtered in the filter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterKind {
    /// Free text input.
    Text,
    /// Dropdown filled from an index table.
    Select,
    /// A from/to pair of inputs.
    Range,
}

/// How a column is edited in the add/edit form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    #[default]
    Text,
    Date,
    Number,
    Select,
}

impl EditKind {
    /// The input `type` attribute for this kind.
    pub fn input_type(&self) -> &'static str {
        match self {
            Self::Text | Self::Select => "text",
            Self::Date => "date",
            Self::Number => "number",
        }
    }
}

/// Custom cell renderer: `(column, record, column name, raw value) -> cell content`.
pub type CellRenderer = Arc<dyn Fn(&Column, &Record, &str, &Value) -> Content + Send + Sync>;

/// Describes one column of the grid.
///
/// Columns are declared once as static configuration (in code or JSON) and
/// cloned before plugins run, so plugin changes never reach the original.
///
/// # Example
///
/// ```
/// use salesgrid_lib::model::{Column, EditKind, FilterKind};
///
/// let column = Column::new("total", "Total")
///     .sortable()
///     .filter(FilterKind::Range)
///     .edit(EditKind::Number);
/// assert!(column.sort);
/// ```
#[derive(Clone, Deserialize)]
pub struct Column {
    /// Unique, stable key. Also the record field the column displays.
    pub name: String,
    /// Display text for the header.
    pub label: String,
    #[serde(default)]
    pub sort: bool,
    #[serde(default)]
    pub filter: Option<FilterKind>,
    #[serde(default)]
    pub edit: Option<EditKind>,
    /// Name of the index table that supplies select choices.
    #[serde(default)]
    pub options: Option<String>,
    /// Fixed display width, e.g. `"120px"`. Defaults to `1fr`.
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(skip)]
    pub renderer: Option<CellRenderer>,
}

impl Column {
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            sort: false,
            filter: None,
            edit: None,
            options: None,
            size: None,
            required: false,
            renderer: None,
        }
    }

    pub fn sortable(mut self) -> Self {
        self.sort = true;
        self
    }

    pub fn filter(mut self, kind: FilterKind) -> Self {
        self.filter = Some(kind);
        self
    }

    pub fn edit(mut self, kind: EditKind) -> Self {
        self.edit = Some(kind);
        self
    }

    pub fn options(mut self, index_name: impl Into<String>) -> Self {
        self.options = Some(index_name.into());
        self
    }

    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn renderer<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&Column, &Record, &str, &Value) -> Content + Send + Sync + 'static,
    {
        self.renderer = Some(Arc::new(renderer));
        self
    }

    /// Header text: the label, or the name when the label is blank.
    pub fn header(&self) -> &str {
        if self.label.is_empty() { &self.name } else { &self.label }
    }

    /// The width used in the table's column template.
    pub fn width(&self) -> &str {
        self.size.as_deref().unwrap_or("1fr")
    }

    /// Content of this column's cell for `record`.
    pub fn cell(&self, record: &Record) -> Content {
        let value = record.get(&self.name).unwrap_or(&Value::Null);
        match &self.renderer {
            Some(render) => render(self, record, &self.name, value),
            None => Content::Text(super::display_value(value)),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("sort", &self.sort)
            .field("filter", &self.filter)
            .field("edit", &self.edit)
            .field("options", &self.options)
            .field("size", &self.size)
            .field("required", &self.required)
            .field("renderer", &self.renderer.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_host_config() {
        let json = r#"{ "name": "seller", "label": "Seller", "filter": "select", "options": "sellers", "edit": "select" }"#;
        let column: Column = serde_json::from_str(json).unwrap();
        assert_eq!(column.filter, Some(FilterKind::Select));
        assert_eq!(column.edit, Some(EditKind::Select));
        assert_eq!(column.options.as_deref(), Some("sellers"));
        assert!(!column.sort);
        assert_eq!(column.width(), "1fr");
    }

    #[test]
    fn test_cell_uses_renderer() {
        let record = Record::new().set("total", 12.5);
        let plain = Column::new("total", "Total");
        assert_eq!(plain.cell(&record), Content::Text("12.5".into()));

        let custom = Column::new("total", "Total")
            .renderer(|_, _, name, value| Content::Text(format!("{name}={value}")));
        assert_eq!(custom.cell(&record), Content::Text("total=12.5".into()));
    }
}
