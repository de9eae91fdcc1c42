//! Per-service application context, built once at start-up and handed to
//! every handler through axum `State`.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use service::account::{repo::seaorm::SeaOrmAccountRepository, session::SessionKeys, AccountService};
use service::track::{repo::seaorm::SeaOrmTrackRepository, TrackService};

#[derive(Clone)]
pub struct AccountState {
    pub accounts: Arc<AccountService<SeaOrmAccountRepository>>,
    /// Mark session/CSRF cookies `Secure` (HTTPS deployments).
    pub cookie_secure: bool,
}

impl AccountState {
    pub fn new(db: DatabaseConnection, sessions: SessionKeys, cookie_secure: bool) -> Self {
        let repo = Arc::new(SeaOrmAccountRepository { db });
        Self { accounts: Arc::new(AccountService::new(repo, sessions)), cookie_secure }
    }
}

#[derive(Clone)]
pub struct TrackState {
    pub tracks: Arc<TrackService<SeaOrmTrackRepository>>,
}

impl TrackState {
    pub fn new(db: DatabaseConnection) -> Self {
        let repo = Arc::new(SeaOrmTrackRepository { db });
        Self { tracks: Arc::new(TrackService::new(repo)) }
    }
}
