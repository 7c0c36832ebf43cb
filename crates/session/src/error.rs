use haven_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("character not found: {0}")]
    CharacterNotFound(i64),

    #[error("animal not found: {0}")]
    AnimalNotFound(i64),

    #[error("product not found: {0}")]
    ProductNotFound(i64),

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("unknown coordinate preset: {0}")]
    UnknownPreset(String),
}

impl SessionError {
    pub(crate) fn validation(field: &str, reason: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            reason: reason.to_string(),
        }
    }
}
