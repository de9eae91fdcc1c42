use std::{future::Future, process::ExitCode};

use axum::Router;
use configs::{AppConfig, DatabaseConfig, Service, SessionConfig};
use dotenvy::dotenv;
use sea_orm::DatabaseConnection;
use service::account::session::SessionKeys;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    routes,
    state::{AccountState, TrackState},
};

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Make sure the database is reachable and its schema is current.
pub async fn prepare_db(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    common::env::ensure_database_dir(&cfg.url).await?;
    let db = models::db::connect_with_config(cfg).await?;
    models::db::migrate(&db).await?;
    Ok(db)
}

/// Session signing keys. Without a configured secret every process start
/// invalidates earlier sessions.
fn session_keys(cfg: &SessionConfig) -> SessionKeys {
    match cfg.secret.as_deref() {
        Some(secret) => SessionKeys::new(secret, cfg.ttl_hours),
        None => {
            warn!(event = "session_secret_missing", "no session secret configured; using a random per-process key");
            SessionKeys::random(cfg.ttl_hours)
        }
    }
}

/// Build the router for one service, connecting to its database when it has one.
pub async fn build_app(service: Service, cfg: &AppConfig) -> anyhow::Result<Router> {
    let cors = build_cors();
    let app = match service {
        Service::Account => {
            let db = prepare_db(&cfg.database).await?;
            let state = AccountState::new(db, session_keys(&cfg.session), cfg.session.cookie_secure);
            routes::build_account_router(state, cors)
        }
        Service::Tracks => {
            let db = prepare_db(&cfg.database).await?;
            routes::build_tracks_router(TrackState::new(db), cors, cfg.upload.max_body_bytes)
        }
        Service::Playlist => routes::build_playlist_router(cors),
    };
    Ok(app)
}

/// Bind, serve until `shutdown` resolves, then drain in-flight requests.
pub async fn run(service: Service, cfg: AppConfig, shutdown: impl Future<Output = ()> + Send + 'static) -> anyhow::Result<()> {
    let app = build_app(service, &cfg).await?;
    let addr = cfg.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(service = service.name(), %addr, "listening");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

/// Process entry point shared by the service binaries.
pub fn launch(service: Service) -> ExitCode {
    // 提前加载 .env，使得 RUST_LOG 等环境变量生效
    dotenv().ok();
    common::utils::logging::init_logging_from_env();
    let name = service.name();
    info!(service = name, event = "logger_init", "tracing subscriber initialized");

    let service_id = Uuid::new_v4();
    let pid = std::process::id();
    let version = env!("CARGO_PKG_VERSION");

    std::panic::set_hook(Box::new(move |info| {
        error!(service = name, event = "panic", %service_id, pid, message = %info, "unhandled panic occurred");
    }));

    let cfg = match AppConfig::load_and_validate(service) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(service = name, event = "config_invalid", error = %e, "failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let worker_threads = cfg.server.worker_threads;
    let mut builder = tokio::runtime::Builder::new_multi_thread();
    builder.enable_all();
    if let Some(w) = worker_threads {
        builder.worker_threads(w);
    }
    let rt = match builder.build() {
        Ok(rt) => rt,
        Err(e) => {
            error!(service = name, event = "runtime_build_failed", error = %e, "failed to build tokio runtime");
            return ExitCode::FAILURE;
        }
    };

    info!(
        service = name,
        event = "start",
        %service_id,
        pid,
        version,
        threads = worker_threads.unwrap_or_default(),
        "service starting"
    );

    let shutdown = async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(service = name, event = "signal_error", error = %e, "failed to listen for Ctrl+C");
            return;
        }
        info!(service = name, event = "shutdown_signal", %service_id, pid, "received Ctrl+C, shutting down");
    };

    match rt.block_on(run(service, cfg, shutdown)) {
        Ok(()) => {
            info!(service = name, event = "stop", %service_id, pid, "service stopped normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!(service = name, event = "run_failed", error = %e, "service returned error");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn playlist_app_needs_no_database() {
        let mut cfg = AppConfig::defaults_for(Service::Playlist);
        cfg.database.url = String::new();
        assert!(build_app(Service::Playlist, &cfg).await.is_ok());
    }

    #[tokio::test]
    async fn tracks_app_creates_sqlite_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tracks.db");
        let mut cfg = AppConfig::defaults_for(Service::Tracks);
        cfg.database.url = format!("sqlite://{}?mode=rwc", path.display());
        build_app(Service::Tracks, &cfg).await.unwrap();
        assert!(path.exists());
    }
}
