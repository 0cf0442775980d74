//! Schema definitions and migration runner for SurrealDB.
//!
//! Tables use SCHEMAFULL mode. UUIDs are stored as strings; follow-up
//! dates as ISO `YYYY-MM-DD` strings so that string order is date order.
//! Follow-up enums are stored as strings with ASSERT constraints. Lead
//! status is left unconstrained because other clients write it too.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
    #[allow(dead_code)]
    name: String,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "leads_and_followups",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Leads
-- =======================================================================
DEFINE TABLE lead SCHEMAFULL;
DEFINE FIELD name ON TABLE lead TYPE string;
DEFINE FIELD email ON TABLE lead TYPE option<string>;
DEFINE FIELD phone ON TABLE lead TYPE option<string>;
DEFINE FIELD status ON TABLE lead TYPE option<string>;
DEFINE FIELD source ON TABLE lead TYPE option<string>;
DEFINE FIELD notes ON TABLE lead TYPE option<string>;
DEFINE FIELD created_at ON TABLE lead TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE lead TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_lead_created_at ON TABLE lead COLUMNS created_at;

-- =======================================================================
-- Follow-ups (owned by a lead)
-- =======================================================================
DEFINE TABLE followup SCHEMAFULL;
DEFINE FIELD lead_id ON TABLE followup TYPE string;
DEFINE FIELD followup_date ON TABLE followup TYPE string \
    ASSERT string::len($value) = 10;
DEFINE FIELD followup_time ON TABLE followup TYPE option<string>;
DEFINE FIELD notes ON TABLE followup TYPE option<string>;
DEFINE FIELD status ON TABLE followup TYPE string \
    ASSERT $value IN ['Pending', 'Completed', 'Cancelled'];
DEFINE FIELD priority ON TABLE followup TYPE string \
    ASSERT $value IN ['High', 'Medium', 'Low'];
DEFINE FIELD reminder_days ON TABLE followup TYPE int DEFAULT 0 \
    ASSERT $value >= 0;
DEFINE FIELD created_at ON TABLE followup TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE followup TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD completed_at ON TABLE followup TYPE option<datetime>;
DEFINE INDEX idx_followup_lead ON TABLE followup COLUMNS lead_id;
DEFINE INDEX idx_followup_date ON TABLE followup COLUMNS followup_date;
DEFINE INDEX idx_followup_status_date ON TABLE followup \
    COLUMNS status, followup_date;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates a `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the current maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT * FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }
        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "Migration v{} '{}' failed: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query(
            "CREATE _migration SET version = $version, \
             name = $name",
        )
        .bind(("version", migration.version))
        .bind(("name", migration.name))
        .await?
        .check()
        .map_err(|e| {
            DbError::Migration(format!(
                "Failed to record migration v{}: {}",
                migration.version, e,
            ))
        })?;

        info!(version = migration.version, "Migration applied");
    }

    Ok(())
}

/// Returns the raw schema DDL for version 1.
pub fn schema_v1() -> &'static str {
    SCHEMA_V1
}
