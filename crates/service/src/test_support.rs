#![cfg(test)]
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

/// Fresh migrated SQLite database per test. Keep the `TempDir` alive while
/// the connection is in use.
pub async fn get_db() -> Result<(TempDir, DatabaseConnection), anyhow::Error> {
    let dir = tempfile::tempdir()?;
    let mut cfg = configs::DatabaseConfig::default();
    cfg.url = format!("sqlite://{}?mode=rwc", dir.path().join("service.db").display());
    cfg.max_connections = 1;
    let db = models::db::connect_with_config(&cfg).await?;
    models::db::migrate(&db).await?;
    Ok((dir, db))
}
