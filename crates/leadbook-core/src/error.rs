//! Error types for the Leadbook system.

use thiserror::Error;

use crate::models::UnknownVariant;

#[derive(Debug, Error)]
pub enum CrmError {
    /// The record store was never connected. Returned before any I/O.
    #[error("Record store not initialized")]
    NotInitialized,

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Database error: {0}")]
    Database(String),
}

impl From<UnknownVariant> for CrmError {
    fn from(err: UnknownVariant) -> Self {
        CrmError::Validation {
            message: err.to_string(),
        }
    }
}

pub type CrmResult<T> = Result<T, CrmError>;
