use utoipa::{OpenApi, ToSchema};

use crate::dto::{ClearedTracks, CsrfTokenJson, DeletedTrack, ErrorBody, FieldErrorBody, HealthResponse, TrackJson, UserJson};

/// Multipart body of `POST /tracks`, documentation only.
#[allow(dead_code)]
#[derive(ToSchema)]
pub struct TrackUploadForm {
    pub name: String,
    pub artist: String,
    /// ISO `YYYY-MM-DD`, may be empty.
    pub release_date: Option<String>,
    #[schema(value_type = String, format = Binary)]
    pub data: Vec<u8>,
    #[schema(value_type = Option<String>, format = Binary)]
    pub cover: Option<Vec<u8>>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::account::register_form,
        crate::routes::account::register,
        crate::routes::account::login_form,
        crate::routes::account::login,
        crate::routes::account::logout,
        crate::routes::account::get_user,
        crate::routes::account::current_user,
    ),
    components(schemas(HealthResponse, UserJson, CsrfTokenJson, ErrorBody, FieldErrorBody)),
    tags((name = "health"), (name = "account"))
)]
pub struct AccountApiDoc;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::tracks::list,
        crate::routes::tracks::get_track,
        crate::routes::tracks::upload,
        crate::routes::tracks::delete_track,
        crate::routes::tracks::clear,
    ),
    components(schemas(HealthResponse, TrackJson, TrackUploadForm, DeletedTrack, ClearedTracks, ErrorBody, FieldErrorBody)),
    tags((name = "health"), (name = "tracks"))
)]
pub struct TracksApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docs_list_their_own_paths() {
        let account = serde_json::to_value(AccountApiDoc::openapi()).unwrap();
        assert!(account["paths"]["/login"].is_object());
        assert!(account["paths"]["/tracks"].is_null());

        let tracks = serde_json::to_value(TracksApiDoc::openapi()).unwrap();
        assert!(tracks["paths"]["/tracks/{id}"]["delete"].is_object());
    }
}
