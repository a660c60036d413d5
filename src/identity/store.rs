use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use tracing::info;

use super::principal::{Credential, Role};
use crate::error::AuthError;
use crate::security;

/// Built-in accounts used when no users file is configured: (username, password, role, disabled).
pub const DEMO_ACCOUNTS: &[(&str, &str, Role, bool)] = &[
    ("doctor", "doctor123", Role::Doctor, false),
    ("patient", "patient123", Role::Patient, false),
    ("inactive", "inactive123", Role::Patient, true),
];

/// Read-only username -> credential map, built once at startup.
pub struct CredentialStore {
    users: HashMap<String, Credential>,
    // Verified against for unknown usernames so both failure paths do the same work.
    dummy_hash: String,
}

impl CredentialStore {
    pub fn from_credentials(creds: Vec<Credential>) -> Result<Self> {
        let mut users = HashMap::with_capacity(creds.len());
        for c in creds {
            if c.username.is_empty() {
                return Err(anyhow!("credential with empty username"));
            }
            if users.contains_key(&c.username) {
                return Err(anyhow!("duplicate username '{}'", c.username));
            }
            users.insert(c.username.clone(), c);
        }
        let dummy_hash = security::hash_password("healthqai-dummy")?;
        Ok(Self { users, dummy_hash })
    }

    /// Hash the built-in demo passwords. Mirrors the default-admin seeding used on first start.
    pub fn with_demo_accounts() -> Result<Self> {
        let mut creds = Vec::with_capacity(DEMO_ACCOUNTS.len());
        for (username, password, role, disabled) in DEMO_ACCOUNTS {
            creds.push(Credential {
                username: username.to_string(),
                password_hash: security::hash_password(password)?,
                disabled: *disabled,
                role: *role,
            });
        }
        Self::from_credentials(creds)
    }

    /// Load a JSON array of credentials (`username`, `password_hash`, `disabled`, `role`).
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading users file {}", path.display()))?;
        let creds: Vec<Credential> = serde_json::from_str(&text)
            .with_context(|| format!("parsing users file {}", path.display()))?;
        info!(target: "startup", "loaded {} accounts from {}", creds.len(), path.display());
        Self::from_credentials(creds)
    }

    pub fn lookup(&self, username: &str) -> Option<&Credential> {
        self.users.get(username)
    }

    pub fn len(&self) -> usize { self.users.len() }

    pub fn is_empty(&self) -> bool { self.users.is_empty() }

    /// Unknown user and wrong password are indistinguishable to the caller.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<&Credential, AuthError> {
        match self.lookup(username) {
            Some(cred) if security::verify_password(&cred.password_hash, password) => Ok(cred),
            Some(_) => Err(AuthError::InvalidCredentials),
            None => {
                let _ = security::verify_password(&self.dummy_hash, password);
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
