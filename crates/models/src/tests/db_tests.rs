use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use anyhow::Result;

use super::setup_test_db;
use crate::track;

/// Migrations create both tables on an empty database
#[tokio::test]
async fn test_schema_created() -> Result<()> {
    let (_dir, db) = setup_test_db().await?;

    for table in ["user", "tracks"] {
        let row = db
            .query_one(Statement::from_sql_and_values(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
                [table.into()],
            ))
            .await?;
        assert!(row.is_some(), "table {table} missing");
    }
    Ok(())
}

/// Running the migrator twice is a no-op
#[tokio::test]
async fn test_migrate_is_idempotent() -> Result<()> {
    let (_dir, db) = setup_test_db().await?;
    crate::db::migrate(&db).await?;
    assert_eq!(track::count(&db).await?, 0);
    Ok(())
}

#[tokio::test]
async fn test_connect_rejects_unreachable_url() {
    let mut cfg = configs::DatabaseConfig::default();
    cfg.url = "sqlite:///nonexistent-dir-for-tests/sub/x.db?mode=ro".into();
    cfg.connect_timeout_secs = 1;
    cfg.acquire_timeout_secs = 1;
    assert!(crate::db::connect_with_config(&cfg).await.is_err());
}
