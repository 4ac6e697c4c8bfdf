//! Error types

mod api;
mod schema;
mod validation;

pub use api::*;
pub use schema::*;
pub use validation::*;

/// Top-level error for grid operations.
///
/// Data-layer calls propagate these unchanged; only the editing flow turns
/// them into a user-facing notice.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport or application failure talking to the record source.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// The column schema violates a construction rule.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// One or more form fields failed validation.
    #[error("Validation failed: {}", join_validation(.0))]
    Validation(Vec<FieldValidationError>),
}

impl Error {
    /// Returns the HTTP status code if this is an HTTP error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(api) => api.status_code(),
            _ => None,
        }
    }
}

fn join_validation(errors: &[FieldValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
