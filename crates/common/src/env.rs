//! Environment/runtime helpers
//!
//! Sanity checks to ensure expected directories exist at startup.

use std::path::Path;

use tracing::{debug, warn};

/// Ensure the directory that will hold a SQLite database file exists.
///
/// Accepts a connection URL such as `sqlite://data/account.db?mode=rwc`.
/// Non-file URLs (in-memory SQLite, Postgres) are left alone.
pub async fn ensure_database_dir(database_url: &str) -> anyhow::Result<()> {
    let Some(path) = sqlite_file_path(database_url) else {
        debug!(%database_url, "no local database file to prepare");
        return Ok(());
    };
    let Some(parent) = Path::new(path).parent() else { return Ok(()) };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    if tokio::fs::metadata(parent).await.is_err() {
        warn!(dir = %parent.display(), "database directory missing; creating it");
    }
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    Ok(())
}

/// Extract the file path from a `sqlite:` URL, or `None` for memory/other backends.
pub fn sqlite_file_path(database_url: &str) -> Option<&str> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(path)
}
