//! Schema construction errors

/// Errors raised while assembling or extending a column schema.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    /// A column was declared with an empty name.
    #[error("Column name must not be empty")]
    EmptyName,

    /// Two columns share the same name.
    #[error("Duplicate column '{name}'")]
    DuplicateColumn { name: String },

    /// A select filter names no option set to draw its choices from.
    #[error("Column '{column}' uses a select filter without an option set")]
    SelectWithoutOptions { column: String },
}

impl SchemaError {
    /// Creates a new duplicate column error.
    pub fn duplicate(name: impl Into<String>) -> Self {
        Self::DuplicateColumn { name: name.into() }
    }
}
