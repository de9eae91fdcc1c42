//! Per-service configuration: TOML file first, environment overrides second,
//! built-in defaults for anything left out.

use std::path::Path;

use anyhow::{anyhow, Result};
use serde::Deserialize;

/// The three deployable services. Each one owns its own config file and database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Account,
    Tracks,
    Playlist,
}

impl Service {
    pub fn name(self) -> &'static str {
        match self {
            Service::Account => "account",
            Service::Tracks => "tracks",
            Service::Playlist => "playlist",
        }
    }

    fn default_port(self) -> u16 {
        match self {
            Service::Account => 5001,
            Service::Tracks => 5002,
            Service::Playlist => 5003,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

fn default_host() -> String { "127.0.0.1".into() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: 0, worker_threads: Some(4) }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 1 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// HMAC key for session tokens. When absent a random key is generated at
    /// start-up, so sessions do not survive a restart.
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default = "default_ttl_hours")]
    pub ttl_hours: i64,
    #[serde(default)]
    pub cookie_secure: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { secret: None, ttl_hours: default_ttl_hours(), cookie_secure: false }
    }
}

fn default_ttl_hours() -> i64 { 24 * 30 }

/// Upper bound for `session.ttl_hours` (ten years).
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self { max_body_bytes: default_max_body_bytes() }
    }
}

fn default_max_body_bytes() -> usize { 64 * 1024 * 1024 }

/// Config file location: `CONFIG_PATH` if set, otherwise `config/<service>.toml`.
pub fn config_path(service: Service) -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| format!("config/{}.toml", service.name()))
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Built-in defaults for a service: loopback host, per-service port and a
    /// SQLite file under `data/`.
    pub fn defaults_for(service: Service) -> Self {
        let mut cfg = AppConfig::default();
        cfg.server.port = service.default_port();
        cfg.database.url = format!("sqlite://data/{}.db?mode=rwc", service.name());
        cfg
    }

    /// Load the service's config file (or defaults when it does not exist),
    /// apply environment overrides and validate.
    pub fn load_and_validate(service: Service) -> Result<Self> {
        let path = config_path(service);
        let mut cfg = if Path::new(&path).exists() {
            let mut loaded = load_from_file(&path)?;
            loaded.fill_missing(service);
            loaded
        } else {
            Self::defaults_for(service)
        };
        cfg.apply_env_overrides();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    fn fill_missing(&mut self, service: Service) {
        let defaults = Self::defaults_for(service);
        if self.server.port == 0 {
            self.server.port = defaults.server.port;
        }
        if self.database.url.trim().is_empty() && std::env::var("DATABASE_URL").is_err() {
            self.database.url = defaults.database.url;
        }
    }

    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.server.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.server.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            self.server.worker_threads = Some(w);
        }
        if let Ok(url) = std::env::var("DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(secret) = std::env::var("SESSION_SECRET") {
            self.session.secret = Some(secret);
        }
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.database.validate()?;
        self.session.validate()?;
        if self.upload.max_body_bytes == 0 {
            return Err(anyhow!("upload.max_body_bytes must be positive"));
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in the config file or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("sqlite:") || lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with sqlite:, postgres:// or postgresql://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl SessionConfig {
    fn validate(&self) -> Result<()> {
        if self.ttl_hours <= 0 || self.ttl_hours > MAX_SESSION_TTL_HOURS {
            return Err(anyhow!("session.ttl_hours must be in 1..={MAX_SESSION_TTL_HOURS}"));
        }
        if let Some(secret) = &self.secret {
            if secret.len() < 16 {
                return Err(anyhow!("session.secret must be at least 16 bytes"));
            }
        }
        Ok(())
    }
}
