//! JSON shapes returned by the services. Binary columns are standard base64.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use service::{account::domain::Account, track::domain::Track, validation::FieldError};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserJson {
    pub id: i32,
    pub username: String,
    pub email: String,
    /// Stored password hash (PHC string).
    pub password: String,
    /// Base64 picture, if any.
    pub picture: Option<String>,
}

impl From<&Account> for UserJson {
    fn from(a: &Account) -> Self {
        Self {
            id: a.id,
            username: a.username.clone(),
            email: a.email.clone(),
            password: a.password_hash.clone(),
            picture: a.picture.as_deref().map(|p| STANDARD.encode(p)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TrackJson {
    pub id: i32,
    pub name: String,
    pub artist: String,
    /// ISO `YYYY-MM-DD`.
    pub release_date: Option<String>,
    pub data: String,
    pub cover: Option<String>,
}

impl From<&Track> for TrackJson {
    fn from(t: &Track) -> Self {
        Self {
            id: t.id,
            name: t.name.clone(),
            artist: t.artist.clone(),
            release_date: t.release_date.map(|d| d.format("%Y-%m-%d").to_string()),
            data: STANDARD.encode(&t.data),
            cover: t.cover.as_deref().map(|c| STANDARD.encode(c)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedTrack {
    pub deleted: i32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClearedTracks {
    pub deleted: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FieldErrorBody {
    pub field: String,
    pub message: String,
}

impl From<FieldError> for FieldErrorBody {
    fn from(e: FieldError) -> Self {
        Self { field: e.field, message: e.message }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldErrorBody>>,
}

/// Returned by `GET /register` and `GET /login` to JSON clients.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CsrfTokenJson {
    pub csrf_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}
