/// Connection and schema tests
pub mod db_tests;

/// CRUD and constraint tests for `user` and `track`
pub mod crud_tests;


use sea_orm::DatabaseConnection;
use tempfile::TempDir;

/// Fresh SQLite file with the schema applied. Keep the `TempDir` alive for
/// as long as the connection is used.
pub(crate) async fn setup_test_db() -> anyhow::Result<(TempDir, DatabaseConnection)> {
    let dir = tempfile::tempdir()?;
    let mut cfg = configs::DatabaseConfig::default();
    cfg.url = format!("sqlite://{}?mode=rwc", dir.path().join("models.db").display());
    cfg.max_connections = 1;
    let db = crate::db::connect_with_config(&cfg).await?;
    crate::db::migrate(&db).await?;
    Ok((dir, db))
}
