//! Double-submit CSRF tokens: the same random value lives in a cookie and in
//! a hidden form field, and a POST is accepted only when both agree.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use rand::{distributions::Alphanumeric, Rng};

pub const CSRF_COOKIE: &str = "csrf_token";
pub const CSRF_FIELD: &str = "csrf_token";
const TOKEN_LEN: usize = 32;

/// Token for the form being rendered. An existing cookie is reused so several
/// open tabs keep working.
pub fn issue(jar: CookieJar, secure: bool) -> (CookieJar, String) {
    if let Some(existing) = jar.get(CSRF_COOKIE).map(|c| c.value().to_string()) {
        if existing.len() == TOKEN_LEN {
            return (jar, existing);
        }
    }
    let token: String = rand::thread_rng().sample_iter(&Alphanumeric).take(TOKEN_LEN).map(char::from).collect();
    let cookie = Cookie::build((CSRF_COOKIE, token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(secure)
        .build();
    (jar.add(cookie), token)
}

pub fn verify(jar: &CookieJar, submitted: Option<&str>) -> bool {
    match (jar.get(CSRF_COOKIE), submitted) {
        (Some(cookie), Some(submitted)) if !submitted.is_empty() => constant_time_eq(cookie.value().as_bytes(), submitted.as_bytes()),
        _ => false,
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
