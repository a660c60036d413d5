use anyhow::{Result, anyhow};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::tprintln;

pub type AccessToken = String;

pub const ALGORITHM: Algorithm = Algorithm::HS256;
/// TTL used by the token endpoint unless configured otherwise.
pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 30;
/// TTL applied when the caller does not pass one.
pub const FALLBACK_TTL_MINUTES: i64 = 15;
/// Upper bound accepted from configuration (one week).
pub const MAX_TOKEN_TTL_MINUTES: i64 = 7 * 24 * 60;

const SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
}

/// Signs and verifies bearer tokens with a symmetric secret held for the process lifetime.
/// Replacing the issuer (e.g. a restart) invalidates every outstanding token.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn from_secret(secret: &[u8]) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked against our own clock in `verify_at`.
        validation.validate_exp = false;
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Fresh random secret, generated once at startup and never persisted.
    pub fn generate() -> Result<Self> {
        let mut secret = [0u8; SECRET_LEN];
        getrandom::getrandom(&mut secret).map_err(|e| anyhow!("generating token secret: {e}"))?;
        Ok(Self::from_secret(&secret))
    }

    pub fn issue(&self, subject: &str, ttl: Option<Duration>) -> Result<AccessToken> {
        self.issue_at(subject, Utc::now(), ttl)
    }

    pub fn issue_at(&self, subject: &str, now: DateTime<Utc>, ttl: Option<Duration>) -> Result<AccessToken> {
        let ttl = ttl.unwrap_or_else(|| Duration::minutes(FALLBACK_TTL_MINUTES));
        let exp = now
            .checked_add_signed(ttl)
            .ok_or_else(|| anyhow!("token expiry out of range for ttl {ttl}"))?;
        let claims = Claims { sub: subject.to_string(), exp: exp.timestamp() };
        let token = jsonwebtoken::encode(&Header::new(ALGORITHM), &claims, &self.encoding)
            .map_err(|e| anyhow!("signing token: {e}"))?;
        tprintln!("token.issue sub={} exp={}", claims.sub, claims.exp);
        Ok(token)
    }

    /// Returns the subject of a well-signed, unexpired token.
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Malformed,
            })?;
        if now.timestamp() >= data.claims.exp {
            return Err(AuthError::Expired);
        }
        if data.claims.sub.is_empty() {
            return Err(AuthError::Malformed);
        }
        Ok(data.claims.sub)
    }
}

#[cfg(test)]
#[path = "token_tests.rs"]
mod token_tests;
