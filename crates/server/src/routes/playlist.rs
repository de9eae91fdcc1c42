use axum::{http::StatusCode, response::Html};

use crate::views;

pub async fn index() -> Html<String> {
    Html(views::playlist_page())
}

/// Placeholder until playlists are stored.
pub async fn create() -> StatusCode {
    StatusCode::OK
}
