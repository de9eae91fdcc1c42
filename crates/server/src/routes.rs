pub mod account;
pub mod playlist;
pub mod tracks;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::get,
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::Health;

use crate::{
    openapi::{AccountApiDoc, TracksApiDoc},
    session,
    state::{AccountState, TrackState},
};

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, body = crate::dto::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Layers shared by every service: CORS and request tracing.
fn with_common_layers(router: Router, cors: CorsLayer) -> Router {
    router.layer(cors).layer(
        TraceLayer::new_for_http()
            // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            // 响应返回时打点，包含状态码与耗时
            .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
            // 失败（5xx 等）时以 ERROR 记录
            .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
    )
}

/// Account service: registration, login/logout and profile routes.
pub fn build_account_router(state: AccountState, cors: CorsLayer) -> Router {
    // Protected: the current user's profile
    let protected = Router::new()
        .route("/", get(account::current_user))
        .route_layer(middleware::from_fn_with_state(state.clone(), session::require_session));

    let public = Router::new()
        .route("/register", get(account::register_form).post(account::register))
        .route("/login", get(account::login_form).post(account::login))
        .route("/logout", get(account::logout))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(|| async { Json(AccountApiDoc::openapi()) }))
        .route("/:id", get(account::get_user));

    with_common_layers(public.merge(protected).with_state(state), cors)
}

/// Track service. `max_body_bytes` caps upload bodies.
pub fn build_tracks_router(state: TrackState, cors: CorsLayer, max_body_bytes: usize) -> Router {
    let router = Router::new()
        .route("/", get(tracks::index))
        .route("/tracks", get(tracks::list).post(tracks::upload).delete(tracks::clear))
        .route("/tracks/:id", get(tracks::get_track).delete(tracks::delete_track))
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(|| async { Json(TracksApiDoc::openapi()) }))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state);

    with_common_layers(router, cors)
}

pub fn build_playlist_router(cors: CorsLayer) -> Router {
    let router = Router::new()
        .route("/playlist", get(playlist::index))
        .route("/playlist/create", get(playlist::create))
        .route("/health", get(health));

    with_common_layers(router, cors)
}
