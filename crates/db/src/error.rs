use misite_core::error::CoreError;

/// Errors from repository calls that can fail for domain reasons as well as
/// storage ones (single-entity fetches).
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}
