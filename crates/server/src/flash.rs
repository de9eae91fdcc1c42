//! One-shot carrier for form errors across the POST/redirect/GET cycle.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use service::validation::FieldError;
use tracing::warn;

pub const FLASH_COOKIE: &str = "form_errors";

pub fn store(jar: CookieJar, errors: &[FieldError]) -> CookieJar {
    let payload = match serde_json::to_vec(errors) {
        Ok(bytes) => URL_SAFE_NO_PAD.encode(bytes),
        Err(e) => {
            warn!(error = %e, "could not encode form errors");
            return jar;
        }
    };
    jar.add(Cookie::build((FLASH_COOKIE, payload)).path("/").http_only(true).same_site(SameSite::Lax).build())
}

/// Read and clear pending errors. Garbage in the cookie yields no errors.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<FieldError>) {
    let Some(raw) = jar.get(FLASH_COOKIE).map(|c| c.value().to_string()) else {
        return (jar, Vec::new());
    };
    let errors = URL_SAFE_NO_PAD
        .decode(raw.as_bytes())
        .ok()
        .and_then(|bytes| serde_json::from_slice::<Vec<FieldError>>(&bytes).ok())
        .unwrap_or_default();
    (jar.remove(Cookie::build(FLASH_COOKIE).path("/")), errors)
}
