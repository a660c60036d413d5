use chrono::Duration;
use serde::Serialize;
use tracing::{debug, info};

use super::principal::Credential;
use super::store::CredentialStore;
use super::token::{AccessToken, TokenIssuer};
use crate::error::{AppError, AppResult, AuthError};

#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LoginResponse {
    pub access_token: AccessToken,
    pub token_type: &'static str,
}

pub trait AuthProvider: Send + Sync {
    fn login(&self, req: &LoginRequest) -> AppResult<LoginResponse>;
    /// Verify a bearer token and resolve it to an enabled account.
    fn resolve_active_user(&self, token: &str) -> Result<Credential, AuthError>;
}

/// Credentials from the in-memory store, tokens from a process-local issuer.
pub struct LocalAuthProvider {
    pub store: CredentialStore,
    pub issuer: TokenIssuer,
    pub ttl: Duration,
}

impl LocalAuthProvider {
    pub fn new(store: CredentialStore, issuer: TokenIssuer, ttl: Duration) -> Self {
        Self { store, issuer, ttl }
    }
}

impl AuthProvider for LocalAuthProvider {
    fn login(&self, req: &LoginRequest) -> AppResult<LoginResponse> {
        let cred = self.store.authenticate(&req.username, &req.password).map_err(|e| {
            info!(target: "healthqai::auth", "login rejected");
            AppError::from(e)
        })?;
        // Disabled accounts still receive a token; it is refused when used.
        let access_token = self.issuer.issue(&cred.username, Some(self.ttl))?;
        info!(target: "healthqai::auth", user = %cred.username, "login ok");
        Ok(LoginResponse { access_token, token_type: "bearer" })
    }

    fn resolve_active_user(&self, token: &str) -> Result<Credential, AuthError> {
        let subject = self.issuer.verify(token).map_err(|e| {
            debug!(target: "healthqai::auth", "token rejected: {e}");
            e
        })?;
        // No dedicated variant for a vanished subject: it maps to Malformed so it surfaces
        // as the same generic 401 as any other unusable token.
        let cred = self.store.lookup(&subject).ok_or(AuthError::Malformed)?;
        if cred.disabled {
            return Err(AuthError::InactiveAccount);
        }
        Ok(cred.clone())
    }
}
