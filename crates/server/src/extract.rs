//! Request extractors whose rejections go through [`ApiError`] and honour the
//! negotiated response format.

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header, request::Parts},
    Form, Json,
};
use serde::de::DeserializeOwned;

use crate::{
    errors::{ApiError, Rejection},
    negotiate::ResponseFormat,
};

/// Numeric `{id}` path segment.
#[derive(Debug, Clone, Copy)]
pub struct IdPath(pub i32);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for IdPath {
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ResponseFormat(format) = ResponseFormat::from_parts(&parts.headers, &parts.uri);
        Path::<i32>::from_request_parts(parts, state)
            .await
            .map(|Path(id)| IdPath(id))
            .map_err(|e| ApiError::BadRequest(e.body_text()).in_format(format))
    }
}

/// Request body read as JSON when `Content-Type` says so, as an urlencoded
/// form otherwise.
#[derive(Debug, Clone)]
pub struct FormOrJson<T>(pub T);

fn has_json_body(req: &Request) -> bool {
    req.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| ct.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
        .unwrap_or(false)
}

#[async_trait]
impl<S, T> FromRequest<S> for FormOrJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = Rejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let ResponseFormat(format) = ResponseFormat::of(&req);
        if has_json_body(&req) {
            Json::<T>::from_request(req, state)
                .await
                .map(|Json(body)| FormOrJson(body))
                .map_err(|e| ApiError::BadRequest(e.body_text()).in_format(format))
        } else {
            Form::<T>::from_request(req, state)
                .await
                .map(|Form(body)| FormOrJson(body))
                .map_err(|e| ApiError::BadRequest(e.body_text()).in_format(format))
        }
    }
}
