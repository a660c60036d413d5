use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Doctor,
    Patient,
}

/// A stored account. `password_hash` is an Argon2 PHC string.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password_hash: String,
    #[serde(default)]
    pub disabled: bool,
    pub role: Role,
}

/// What a caller may learn about an authenticated account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserView {
    pub username: String,
    pub role: Role,
    pub disabled: bool,
}

impl From<&Credential> for UserView {
    fn from(c: &Credential) -> Self {
        UserView { username: c.username.clone(), role: c.role, disabled: c.disabled }
    }
}
