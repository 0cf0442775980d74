//! SurrealDB connection management and the store handle injected into
//! every repository.

use surrealdb::engine::remote::ws::{Client, Ws};
use surrealdb::opt::auth::Root;
use surrealdb::{Connection, Surreal};
use tracing::info;

use crate::error::DbError;

/// Configuration for connecting to SurrealDB.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// WebSocket URL (e.g., `127.0.0.1:8000`).
    pub url: String,
    /// SurrealDB namespace.
    pub namespace: String,
    /// SurrealDB database name.
    pub database: String,
    /// Root username for authentication.
    pub username: String,
    /// Root password for authentication.
    pub password: String,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            url: "127.0.0.1:8000".into(),
            namespace: "leadbook".into(),
            database: "main".into(),
            username: "root".into(),
            password: "root".into(),
        }
    }
}

impl DbConfig {
    /// False while any connection field is blank or still holds a
    /// `YOUR_...` placeholder.
    pub fn is_configured(&self) -> bool {
        [&self.url, &self.namespace, &self.database]
            .iter()
            .all(|v| !v.trim().is_empty() && !v.starts_with("YOUR_"))
    }
}

/// Manages a connection to SurrealDB.
#[derive(Clone)]
pub struct DbManager {
    db: Surreal<Client>,
}

impl DbManager {
    /// Connect to SurrealDB using the provided configuration.
    ///
    /// Authenticates as root, selects the configured namespace and
    /// database, and returns a ready-to-use manager.
    pub async fn connect(config: &DbConfig) -> Result<Self, surrealdb::Error> {
        info!(
            url = %config.url,
            namespace = %config.namespace,
            database = %config.database,
            "Connecting to SurrealDB"
        );

        let db = Surreal::new::<Ws>(&config.url).await?;

        db.signin(Root {
            username: config.username.clone(),
            password: config.password.clone(),
        })
        .await?;

        db.use_ns(&config.namespace)
            .use_db(&config.database)
            .await?;

        info!("Successfully connected to SurrealDB");

        Ok(Self { db })
    }

    /// Returns a reference to the underlying SurrealDB client.
    pub fn client(&self) -> &Surreal<Client> {
        &self.db
    }

    /// A store handle sharing this manager's connection.
    pub fn handle(&self) -> StoreHandle<Client> {
        StoreHandle::new(self.db.clone())
    }
}

/// An explicitly constructed store handle.
///
/// Built once at startup and cloned into every repository. A handle made
/// with [`StoreHandle::uninitialized`] has no connection: every
/// repository operation on it fails with [`DbError::NotInitialized`]
/// without attempting I/O.
#[derive(Clone)]
pub struct StoreHandle<C: Connection> {
    db: Option<Surreal<C>>,
}

impl<C: Connection> StoreHandle<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db: Some(db) }
    }

    pub fn uninitialized() -> Self {
        Self { db: None }
    }

    pub(crate) fn client(&self) -> Result<&Surreal<C>, DbError> {
        self.db.as_ref().ok_or(DbError::NotInitialized)
    }
}

impl<C: Connection> From<Surreal<C>> for StoreHandle<C> {
    fn from(db: Surreal<C>) -> Self {
        Self::new(db)
    }
}
