//! Accounts, password checks and bearer tokens.
//! Keep the public surface thin and split implementation across sub-modules.

mod principal;
mod store;
mod token;
mod provider;

pub use principal::{Credential, Role, UserView};
pub use store::{CredentialStore, DEMO_ACCOUNTS};
pub use token::{AccessToken, Claims, TokenIssuer, ACCESS_TOKEN_TTL_MINUTES, FALLBACK_TTL_MINUTES, MAX_TOKEN_TTL_MINUTES};
pub use provider::{AuthProvider, LocalAuthProvider, LoginRequest, LoginResponse};
