use crate::types::DbId;

/// Domain-level errors shared by every layer.
///
/// Transport adapters decide how each variant is surfaced; nothing in the
/// core maps an error to a status code.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// A query or path parameter could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for a parse failure on a named parameter.
    pub fn parse(param: &str, value: &str) -> Self {
        CoreError::Parse(format!("invalid value '{value}' for parameter '{param}'"))
    }
}
