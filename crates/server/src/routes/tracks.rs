use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use common::negotiate::Format;
use service::track::domain::TrackUpload;
use tracing::{info, warn};

use crate::{
    dto::{ClearedTracks, DeletedTrack, ErrorBody, TrackJson},
    errors::{ApiError, RejectExt, Rejection},
    extract::IdPath,
    negotiate::ResponseFormat,
    state::TrackState,
    views,
};

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge
    } else {
        ApiError::BadRequest(err.body_text())
    }
}

/// Buffer every known field of the upload form. Unknown fields are skipped.
async fn read_upload(mut multipart: Multipart) -> Result<TrackUpload, ApiError> {
    let mut upload = TrackUpload::default();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "name" => upload.name = field.text().await.map_err(multipart_error)?,
            "artist" => upload.artist = field.text().await.map_err(multipart_error)?,
            "release_date" => upload.release_date = Some(field.text().await.map_err(multipart_error)?),
            "data" => upload.data = Some(field.bytes().await.map_err(multipart_error)?.to_vec()),
            "cover" => upload.cover = Some(field.bytes().await.map_err(multipart_error)?.to_vec()),
            _ => {}
        }
    }
    Ok(upload)
}

pub async fn index() -> Html<String> {
    Html(views::index_page())
}

#[utoipa::path(get, path = "/tracks", tag = "tracks", responses((status = 200, body = [TrackJson]), (status = 500, body = ErrorBody)))]
pub async fn list(State(state): State<TrackState>, ResponseFormat(format): ResponseFormat) -> Result<Response, Rejection> {
    let tracks = state.tracks.list().await.or_reject(format)?;
    Ok(match format {
        Format::Json => Json(tracks.iter().map(TrackJson::from).collect::<Vec<_>>()).into_response(),
        Format::Html => Html(views::track_list_page(&tracks)).into_response(),
    })
}

#[utoipa::path(get, path = "/tracks/{id}", tag = "tracks", params(("id" = i32, Path, description = "Track id")), responses((status = 200, body = TrackJson), (status = 404, body = ErrorBody)))]
pub async fn get_track(
    State(state): State<TrackState>,
    ResponseFormat(format): ResponseFormat,
    IdPath(id): IdPath,
) -> Result<Response, Rejection> {
    let track = state.tracks.get(id).await.or_reject(format)?;
    Ok(match format {
        Format::Json => Json(TrackJson::from(&track)).into_response(),
        Format::Html => Html(views::track_page(&track)).into_response(),
    })
}

#[utoipa::path(
    post,
    path = "/tracks",
    tag = "tracks",
    request_body(content = crate::openapi::TrackUploadForm, content_type = "multipart/form-data"),
    responses((status = 201, body = TrackJson), (status = 413, body = ErrorBody), (status = 422, body = ErrorBody), (status = 500, body = ErrorBody))
)]
pub async fn upload(
    State(state): State<TrackState>,
    ResponseFormat(format): ResponseFormat,
    multipart: Multipart,
) -> Result<Response, Rejection> {
    let upload = read_upload(multipart).await.map_err(|e| {
        warn!(event = "upload_unreadable", error = %e, "multipart body rejected");
        e.in_format(format)
    })?;
    let track = state.tracks.upload(upload).await.or_reject(format)?;
    info!(event = "track_added", track_id = track.id, bytes = track.data.len(), "track uploaded");
    Ok(match format {
        Format::Json => (StatusCode::CREATED, Json(TrackJson::from(&track))).into_response(),
        Format::Html => Html(views::track_added_page(&track)).into_response(),
    })
}

#[utoipa::path(delete, path = "/tracks/{id}", tag = "tracks", params(("id" = i32, Path, description = "Track id")), responses((status = 200, body = DeletedTrack), (status = 404, body = ErrorBody), (status = 500, body = ErrorBody)))]
pub async fn delete_track(
    State(state): State<TrackState>,
    ResponseFormat(format): ResponseFormat,
    IdPath(id): IdPath,
) -> Result<Response, Rejection> {
    let track = state.tracks.delete(id).await.or_reject(format)?;
    info!(event = "track_deleted", track_id = track.id, "track deleted");
    Ok(match format {
        Format::Json => Json(DeletedTrack { deleted: track.id }).into_response(),
        Format::Html => Html(views::track_deleted_page(&track)).into_response(),
    })
}

#[utoipa::path(delete, path = "/tracks", tag = "tracks", responses((status = 200, body = ClearedTracks), (status = 500, body = ErrorBody)))]
pub async fn clear(State(state): State<TrackState>, ResponseFormat(format): ResponseFormat) -> Result<Response, Rejection> {
    let deleted = state.tracks.clear().await.or_reject(format)?;
    info!(event = "tracks_cleared", deleted, "all tracks deleted");
    Ok(match format {
        Format::Json => Json(ClearedTracks { deleted }).into_response(),
        Format::Html => Html(views::tracks_cleared_page(deleted)).into_response(),
    })
}
