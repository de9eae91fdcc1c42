use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequestParts, Query, Request},
    http::{header, request::Parts, HeaderMap, Uri},
};
use common::negotiate::Format;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
struct FormatQuery {
    format: Option<String>,
}

/// Extractor exposing the negotiated response format of a request.
#[derive(Debug, Clone, Copy)]
pub struct ResponseFormat(pub Format);

impl ResponseFormat {
    pub fn from_parts(headers: &HeaderMap, uri: &Uri) -> Self {
        let accept = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok());
        // malformed query strings fall back to the Accept header alone
        let query = Query::<FormatQuery>::try_from_uri(uri).map(|Query(q)| q).unwrap_or_default();
        Self(Format::negotiate(accept, query.format.as_deref()))
    }

    pub fn of(req: &Request) -> Self {
        Self::from_parts(req.headers(), req.uri())
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for ResponseFormat {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self::from_parts(&parts.headers, &parts.uri))
    }
}
