//! Top-level error type for the binary.

use leadbook_core::error::CrmError;
use leadbook_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("database connection is not configured")]
    NotConfigured,

    #[error(transparent)]
    Db(#[from] DbError),

    #[error(transparent)]
    Crm(#[from] CrmError),

    #[error("failed to encode output: {0}")]
    Output(#[from] serde_json::Error),
}
