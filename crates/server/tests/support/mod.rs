#![allow(dead_code)]

use std::collections::BTreeMap;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, Response},
    Router,
};
use sea_orm::DatabaseConnection;
use service::account::session::SessionKeys;
use tempfile::TempDir;
use tower::ServiceExt;

use server::{
    routes,
    startup::prepare_db,
    state::{AccountState, TrackState},
};

fn cors() -> tower_http::cors::CorsLayer {
    tower_http::cors::CorsLayer::very_permissive()
}

/// Fresh SQLite file with the schema applied.
pub async fn test_db() -> anyhow::Result<(TempDir, DatabaseConnection)> {
    let dir = tempfile::tempdir()?;
    let mut cfg = configs::DatabaseConfig::default();
    cfg.url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
    cfg.max_connections = 1;
    let db = prepare_db(&cfg).await?;
    Ok((dir, db))
}

pub async fn account_app() -> anyhow::Result<(TempDir, DatabaseConnection, Router)> {
    let (dir, db) = test_db().await?;
    let state = AccountState::new(db.clone(), SessionKeys::new("integration-test-secret", 1), false);
    Ok((dir, db, routes::build_account_router(state, cors())))
}

pub async fn tracks_app_with_limit(max_body_bytes: usize) -> anyhow::Result<(TempDir, DatabaseConnection, Router)> {
    let (dir, db) = test_db().await?;
    Ok((dir, db.clone(), routes::build_tracks_router(TrackState::new(db), cors(), max_body_bytes)))
}

pub async fn tracks_app() -> anyhow::Result<(TempDir, DatabaseConnection, Router)> {
    tracks_app_with_limit(64 * 1024 * 1024).await
}

pub async fn body_bytes(resp: Response<Body>) -> anyhow::Result<Vec<u8>> {
    Ok(to_bytes(resp.into_body(), usize::MAX).await?.to_vec())
}

pub async fn body_json(resp: Response<Body>) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::from_slice(&body_bytes(resp).await?)?)
}

pub async fn body_text(resp: Response<Body>) -> anyhow::Result<String> {
    Ok(String::from_utf8(body_bytes(resp).await?)?)
}

pub fn location(resp: &Response<Body>) -> Option<String> {
    resp.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()).map(str::to_string)
}

/// Names of cookies set (not removed) by a response.
pub fn cookies_set(resp: &Response<Body>) -> Vec<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(parse_set_cookie)
        .filter(|(_, value, removed)| !removed && !value.is_empty())
        .map(|(name, _, _)| name)
        .collect()
}

fn parse_set_cookie(raw: &str) -> Option<(String, String, bool)> {
    let mut parts = raw.split(';');
    let (name, value) = parts.next()?.trim().split_once('=')?;
    let removed = parts.any(|p| p.trim().eq_ignore_ascii_case("Max-Age=0"));
    Some((name.to_string(), value.to_string(), removed))
}

/// Serve `app` on an ephemeral port and return its base URL.
pub async fn serve(app: Router) -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

/// Minimal cookie-keeping client over an in-process router.
pub struct Browser {
    app: Router,
    cookies: BTreeMap<String, String>,
}

impl Browser {
    pub fn new(app: Router) -> Self {
        Self { app, cookies: BTreeMap::new() }
    }

    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    pub fn set_cookie(&mut self, name: &str, value: &str) {
        self.cookies.insert(name.to_string(), value.to_string());
    }

    pub async fn send(&mut self, mut req: Request<Body>) -> anyhow::Result<Response<Body>> {
        if !self.cookies.is_empty() {
            let header_value = self.cookies.iter().map(|(k, v)| format!("{k}={v}")).collect::<Vec<_>>().join("; ");
            req.headers_mut().insert(header::COOKIE, header_value.parse()?);
        }
        let resp = self.app.clone().oneshot(req).await?;
        for raw in resp.headers().get_all(header::SET_COOKIE).iter().filter_map(|v| v.to_str().ok()) {
            if let Some((name, value, removed)) = parse_set_cookie(raw) {
                if removed || value.is_empty() {
                    self.cookies.remove(&name);
                } else {
                    self.cookies.insert(name, value);
                }
            }
        }
        Ok(resp)
    }

    pub async fn get(&mut self, uri: &str, json: bool) -> anyhow::Result<Response<Body>> {
        let mut builder = Request::builder().uri(uri);
        if json {
            builder = builder.header(header::ACCEPT, "application/json");
        }
        self.send(builder.body(Body::empty())?).await
    }

    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)], json: bool) -> anyhow::Result<Response<Body>> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if json {
            builder = builder.header(header::ACCEPT, "application/json");
        }
        self.send(builder.body(Body::from(serde_urlencoded::to_string(fields)?))?).await
    }

    pub async fn post_json(&mut self, uri: &str, body: &serde_json::Value) -> anyhow::Result<Response<Body>> {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .body(Body::from(serde_json::to_vec(body)?))?;
        self.send(req).await
    }

    /// Fetch a form's CSRF token (sets the CSRF cookie as a side effect).
    pub async fn csrf(&mut self, form_path: &str) -> anyhow::Result<String> {
        let resp = self.get(form_path, true).await?;
        let json = body_json(resp).await?;
        json["csrf_token"].as_str().map(str::to_string).ok_or_else(|| anyhow::anyhow!("no csrf_token in {json}"))
    }

    pub async fn register(&mut self, username: &str, email: &str, password: &str, json: bool) -> anyhow::Result<Response<Body>> {
        let token = self.csrf("/register").await?;
        self.post_form(
            "/register",
            &[
                ("username", username),
                ("email", email),
                ("password", password),
                ("confirm_password", password),
                ("csrf_token", &token),
            ],
            json,
        )
        .await
    }

    pub async fn login(&mut self, email: &str, password: &str, json: bool) -> anyhow::Result<Response<Body>> {
        let token = self.csrf("/login").await?;
        self.post_form("/login", &[("email", email), ("password", password), ("csrf_token", &token)], json).await
    }
}
