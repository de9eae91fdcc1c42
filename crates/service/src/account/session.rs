//! Signed session tokens carried in the session cookie.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub uid: i32,
    pub iat: usize,
    pub exp: usize,
}

/// Longest accepted session lifetime (ten years).
pub const MAX_TTL_HOURS: i64 = 24 * 365 * 10;

/// HMAC key and lifetime used to issue and check session tokens.
#[derive(Clone)]
pub struct SessionKeys {
    secret: Vec<u8>,
    ttl: Duration,
}

impl SessionKeys {
    /// `ttl_hours` is clamped to [`MAX_TTL_HOURS`] either way.
    pub fn new(secret: impl AsRef<[u8]>, ttl_hours: i64) -> Self {
        let ttl = Duration::hours(ttl_hours.clamp(-MAX_TTL_HOURS, MAX_TTL_HOURS));
        Self { secret: secret.as_ref().to_vec(), ttl }
    }

    /// Process-local random key; every token dies with the process.
    pub fn random(ttl_hours: i64) -> Self {
        let mut secret = [0u8; 32];
        OsRng.fill_bytes(&mut secret);
        Self::new(secret, ttl_hours)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn issue(&self, user_id: i32) -> Result<String, ServiceError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            uid: user_id,
            iat: now.timestamp() as usize,
            exp: (now + self.ttl).timestamp() as usize,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(&self.secret))
            .map_err(|e| ServiceError::Token(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, ServiceError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        decode::<SessionClaims>(token, &DecodingKey::from_secret(&self.secret), &validation)
            .map(|data| data.claims)
            .map_err(|e| ServiceError::Token(e.to_string()))
    }
}
