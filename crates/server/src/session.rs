//! Cookie-backed sessions for the account service.
//!
//! The session cookie carries a signed token issued by
//! [`service::account::session::SessionKeys`]. `authorize` is the single
//! place that decides whether a request is logged in; `require_session` turns
//! that decision into a route guard.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::debug;

use crate::{errors::ApiError, negotiate::ResponseFormat, state::AccountState};

pub const SESSION_COOKIE: &str = "session";

/// Identity attached to requests that passed the session guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionUser {
    pub user_id: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    Authenticated(SessionUser),
    Anonymous,
}

impl Authorization {
    pub fn user(self) -> Option<SessionUser> {
        match self {
            Authorization::Authenticated(user) => Some(user),
            Authorization::Anonymous => None,
        }
    }

    pub fn is_authenticated(self) -> bool {
        matches!(self, Authorization::Authenticated(_))
    }
}

/// Resolve the session cookie. A missing, expired or tampered token is simply
/// anonymous.
pub fn authorize(state: &AccountState, jar: &CookieJar) -> Authorization {
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Authorization::Anonymous;
    };
    match state.accounts.authenticate(cookie.value()) {
        Ok(claims) => Authorization::Authenticated(SessionUser { user_id: claims.uid }),
        Err(e) => {
            debug!(error = %e, "ignoring invalid session cookie");
            Authorization::Anonymous
        }
    }
}

/// Guard for routes that need a logged-in user. HTML clients are sent to the
/// login page, JSON clients get 401.
pub async fn require_session(
    State(state): State<AccountState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match authorize(&state, &jar) {
        Authorization::Authenticated(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Authorization::Anonymous => {
            let ResponseFormat(format) = ResponseFormat::of(&req);
            if format.is_json() {
                ApiError::Unauthorized.into_response()
            } else {
                Redirect::to("/login").into_response()
            }
        }
    }
}

/// Persistent ("remember me") session cookie.
pub fn session_cookie(token: String, ttl: chrono::Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .max_age(time::Duration::seconds(ttl.num_seconds()))
        .build()
}

pub fn clear_session(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
}
