use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use common::negotiate::Format;
use service::{errors::ServiceError, validation::FieldError};
use thiserror::Error;
use tracing::error;

use crate::{dto::ErrorBody, views};

/// Typed HTTP failure. Every variant maps to exactly one status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),
    #[error("authentication required")]
    Unauthorized,
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("payload too large")]
    PayloadTooLarge,
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "Validation Error",
            ApiError::Unauthorized => "Unauthorized",
            ApiError::Forbidden(_) => "Forbidden",
            ApiError::BadRequest(_) => "Bad Request",
            ApiError::NotFound(_) => "Not Found",
            ApiError::Conflict(_) => "Conflict",
            ApiError::PayloadTooLarge => "Payload Too Large",
            ApiError::Internal(_) => "Internal Server Error",
        }
    }

    /// Client-facing detail. Internal causes are logged here and replaced
    /// by a generic message.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Internal(detail) => {
                error!(error = %detail, "request failed");
                "internal server error".to_string()
            }
            ApiError::Validation(fields) => service::validation::summarize(fields),
            ApiError::Forbidden(msg) | ApiError::BadRequest(msg) | ApiError::NotFound(msg) | ApiError::Conflict(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    pub fn in_format(self, format: Format) -> Rejection {
        Rejection { format, error: self }
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(fields) => ApiError::Validation(fields),
            ServiceError::Unauthorized => ApiError::Unauthorized,
            ServiceError::NotFound(msg) => ApiError::NotFound(msg),
            ServiceError::Conflict(msg) => ApiError::Conflict(msg),
            ServiceError::Hash(_) | ServiceError::Token(_) | ServiceError::Db(_) => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.title().to_string(),
            message: self.public_message(),
            fields: match self {
                ApiError::Validation(fields) => Some(fields.into_iter().map(Into::into).collect()),
                _ => None,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// An [`ApiError`] rendered in the representation the client asked for.
#[derive(Debug)]
pub struct Rejection {
    pub format: Format,
    pub error: ApiError,
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        match self.format {
            Format::Json => self.error.into_response(),
            Format::Html => {
                let status = self.error.status();
                let page = views::error_page(status, self.error.title(), &self.error.public_message());
                (status, Html(page)).into_response()
            }
        }
    }
}

/// Shorthand for turning service results into format-aware rejections.
pub trait RejectExt<T> {
    fn or_reject(self, format: Format) -> Result<T, Rejection>;
}

impl<T> RejectExt<T> for Result<T, ServiceError> {
    fn or_reject(self, format: Format) -> Result<T, Rejection> {
        self.map_err(|e| ApiError::from(e).in_format(format))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn service_errors_map_to_distinct_statuses() {
        let cases = [
            (ServiceError::Validation(vec![]), StatusCode::UNPROCESSABLE_ENTITY),
            (ServiceError::Unauthorized, StatusCode::UNAUTHORIZED),
            (ServiceError::NotFound("track 1".into()), StatusCode::NOT_FOUND),
            (ServiceError::Conflict("dup".into()), StatusCode::CONFLICT),
            (ServiceError::Db("disk I/O".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status(), status);
        }
    }

    #[test]
    fn internal_detail_is_not_exposed() {
        let err = ApiError::Internal("SQLITE_BUSY: database is locked".into());
        assert_eq!(err.public_message(), "internal server error");
    }

    #[test]
    fn html_rejection_keeps_status() {
        let resp = ApiError::NotFound("track 9 not found".into()).in_format(Format::Html).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let ct = resp.headers().get("content-type").unwrap().to_str().unwrap();
        assert!(ct.starts_with("text/html"));
    }
}
