use thiserror::Error;

use crate::domain::repositories::repository::RecordId;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Record not found: {0}")]
    NotFound(RecordId),

    #[error("Field is assigned by the store and cannot be written: {0}")]
    ImmutableField(String),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("Failed to convert stored row: {0}")]
    Decode(#[from] serde_json::Error),
}

impl RepositoryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, RepositoryError::NotFound(_))
    }
}
