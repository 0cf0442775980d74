//! Leadbook Database — SurrealDB connection management and the record
//! store implementations of the `leadbook-core` repository traits.
//!
//! This crate provides:
//! - Connection management ([`DbManager`], [`DbConfig`])
//! - The injectable store handle ([`StoreHandle`])
//! - Schema initialization and migrations ([`run_migrations`])
//! - Error types ([`DbError`])
//! - Repositories ([`repository::SurrealLeadRepository`],
//!   [`repository::SurrealFollowupRepository`])

mod connection;
mod error;
pub mod repository;
mod schema;

pub use connection::{DbConfig, DbManager, StoreHandle};
pub use error::DbError;
pub use schema::{run_migrations, schema_v1};
