//! Integration tests for schema initialization using in-memory SurrealDB.

use surrealdb::Surreal;
use surrealdb::engine::local::Mem;

#[tokio::test]
async fn schema_migration_applies_successfully() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    leadbook_db::run_migrations(&db).await.unwrap();

    let mut result = db.query("INFO FOR DB").await.unwrap();
    let info: Option<surrealdb_types::Value> = result.take(0).unwrap();
    let info = info.expect("INFO FOR DB should return a value");
    let info_str = format!("{:?}", info);

    assert!(info_str.contains("lead"), "missing lead table");
    assert!(info_str.contains("followup"), "missing followup table");
    assert!(info_str.contains("_migration"), "missing migration table");
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();

    leadbook_db::run_migrations(&db).await.unwrap();
    leadbook_db::run_migrations(&db).await.unwrap();
}

#[tokio::test]
async fn followup_status_is_constrained() {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    leadbook_db::run_migrations(&db).await.unwrap();

    let result = db
        .query(
            "CREATE followup SET lead_id = 'x', followup_date = '2024-06-10', \
             status = 'Done', priority = 'High', reminder_days = 0",
        )
        .await
        .unwrap()
        .check();
    assert!(result.is_err(), "unknown follow-up status must be rejected");
}
