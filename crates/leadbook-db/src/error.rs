//! Database-specific error types and conversions.

use leadbook_core::error::CrmError;

/// Database-layer error type.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("SurrealDB error: {0}")]
    Surreal(#[from] surrealdb::Error),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Statement rejected: {0}")]
    Query(String),

    #[error("Record not found: {entity} with id {id}")]
    NotFound { entity: String, id: String },

    #[error("Store handle has no connection")]
    NotInitialized,

    #[error("Malformed {entity} row: {reason}")]
    InvalidRow { entity: &'static str, reason: String },
}

impl From<DbError> for CrmError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CrmError::NotFound { entity, id },
            DbError::NotInitialized => CrmError::NotInitialized,
            other => CrmError::Database(other.to_string()),
        }
    }
}
