//! Server configuration.
//!
//! Precedence: CLI flags, then `HEALTHQAI_*` environment variables, then built-in defaults.

use std::env;
use std::path::PathBuf;

use chrono::Duration;

use crate::identity::{ACCESS_TOKEN_TTL_MINUTES, MAX_TOKEN_TTL_MINUTES};

pub const DEFAULT_HTTP_PORT: u16 = 8000;
pub const DEFAULT_BIND: &str = "0.0.0.0";
pub const DEFAULT_MODEL_PATH: &str = "models/symptom_model.json";
pub const DEFAULT_CORS_ORIGIN: &str = "http://localhost:5173";

pub const USAGE: &str = "HealthQAI Server\n\nUSAGE:\n  healthqai [--http-port N] [--bind ADDR] [--model PATH] [--users PATH] [--cors-origin URL] [--token-ttl-mins N]\n\nOPTIONS:\n  --http-port N        HTTP port (env: HEALTHQAI_HTTP_PORT, default 8000)\n  --bind ADDR          Listen address (env: HEALTHQAI_BIND, default 0.0.0.0)\n  --model PATH         Model artifact (env: HEALTHQAI_MODEL_PATH, default models/symptom_model.json)\n  --users PATH         JSON users file (env: HEALTHQAI_USERS_FILE, default: built-in demo accounts)\n  --cors-origin URL    Allowed CORS origin (env: HEALTHQAI_CORS_ORIGIN, default http://localhost:5173)\n  --token-ttl-mins N   Access token lifetime in minutes (env: HEALTHQAI_TOKEN_TTL_MINS, default 30)\n";

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub http_port: u16,
    pub bind: String,
    pub model_path: PathBuf,
    pub users_file: Option<PathBuf>,
    pub cors_origin: String,
    pub token_ttl_mins: i64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: DEFAULT_HTTP_PORT,
            bind: DEFAULT_BIND.to_string(),
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            users_file: None,
            cors_origin: DEFAULT_CORS_ORIGIN.to_string(),
            token_ttl_mins: ACCESS_TOKEN_TTL_MINUTES,
        }
    }
}

impl ServerConfig {
    pub fn token_ttl(&self) -> Duration {
        Duration::minutes(self.token_ttl_mins.clamp(1, MAX_TOKEN_TTL_MINUTES))
    }

    /// Resolve from process args and environment.
    pub fn from_env_and_args(args: &[String]) -> Self {
        Self::resolve(args, |name| env::var(name).ok())
    }

    /// Resolve with an injectable environment lookup.
    pub fn resolve(args: &[String], env_lookup: impl Fn(&str) -> Option<String>) -> Self {
        let d = Self::default();
        let http_port = parse_arg(args, "--http-port")
            .and_then(|v| v.parse::<u16>().ok())
            .or_else(|| env_lookup("HEALTHQAI_HTTP_PORT").and_then(|v| v.parse::<u16>().ok()))
            .unwrap_or(d.http_port);
        let bind = parse_arg(args, "--bind")
            .or_else(|| env_lookup("HEALTHQAI_BIND"))
            .unwrap_or(d.bind);
        let model_path = parse_arg(args, "--model")
            .or_else(|| env_lookup("HEALTHQAI_MODEL_PATH"))
            .map(PathBuf::from)
            .unwrap_or(d.model_path);
        let users_file = parse_arg(args, "--users")
            .or_else(|| env_lookup("HEALTHQAI_USERS_FILE"))
            .map(PathBuf::from);
        let cors_origin = parse_arg(args, "--cors-origin")
            .or_else(|| env_lookup("HEALTHQAI_CORS_ORIGIN"))
            .unwrap_or(d.cors_origin);
        // Non-positive lifetimes would issue tokens that are born expired; huge ones overflow the clock.
        let token_ttl_mins = parse_arg(args, "--token-ttl-mins")
            .and_then(|v| v.parse::<i64>().ok())
            .or_else(|| env_lookup("HEALTHQAI_TOKEN_TTL_MINS").and_then(|v| v.parse::<i64>().ok()))
            .filter(|m| (1..=MAX_TOKEN_TTL_MINUTES).contains(m))
            .unwrap_or(d.token_ttl_mins);
        Self { http_port, bind, model_path, users_file, cors_origin, token_ttl_mins }
    }
}

fn parse_arg(args: &[String], flag: &str) -> Option<String> {
    let mut i = 0;
    while i < args.len() {
        if args[i] == flag
            && i + 1 < args.len() {
                return Some(args[i + 1].clone());
            }
        i += 1;
    }
    None
}

pub fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_without_args_or_env() {
        let c = ServerConfig::resolve(&[], |_| None);
        assert_eq!(c, ServerConfig::default());
        assert_eq!(c.http_port, 8000);
        assert_eq!(c.cors_origin, "http://localhost:5173");
        assert_eq!(c.token_ttl(), Duration::minutes(30));
    }

    #[test]
    fn args_override_env() {
        let env: HashMap<&str, &str> = [("HEALTHQAI_HTTP_PORT", "9000"), ("HEALTHQAI_MODEL_PATH", "/env/model.json")].into();
        let c = ServerConfig::resolve(&args(&["healthqai", "--http-port", "9100"]), |k| env.get(k).map(|v| v.to_string()));
        assert_eq!(c.http_port, 9100);
        assert_eq!(c.model_path, PathBuf::from("/env/model.json"));
    }

    #[test]
    fn invalid_values_fall_back() {
        let c = ServerConfig::resolve(&args(&["x", "--http-port", "nope", "--token-ttl-mins", "-5"]), |_| None);
        assert_eq!(c.http_port, 8000);
        assert_eq!(c.token_ttl_mins, 30);
    }

    #[test]
    fn oversized_ttl_falls_back_to_default() {
        for v in ["10081", "1000000000000", "1000000000000000"] {
            let c = ServerConfig::resolve(&args(&["x", "--token-ttl-mins", v]), |_| None);
            assert_eq!(c.token_ttl_mins, 30, "ttl={v}");
        }
        let c = ServerConfig::resolve(&args(&["x", "--token-ttl-mins", "10080"]), |_| None);
        assert_eq!(c.token_ttl(), Duration::minutes(MAX_TOKEN_TTL_MINUTES));
    }

    #[test]
    fn ttl_is_clamped_when_set_directly() {
        let c = ServerConfig { token_ttl_mins: 1_000_000_000_000_000, ..ServerConfig::default() };
        assert_eq!(c.token_ttl(), Duration::minutes(MAX_TOKEN_TTL_MINUTES));
    }

    #[test]
    fn users_file_from_env() {
        let c = ServerConfig::resolve(&[], |k| (k == "HEALTHQAI_USERS_FILE").then(|| "users.json".to_string()));
        assert_eq!(c.users_file, Some(PathBuf::from("users.json")));
    }

    #[test]
    fn flag_without_value_is_ignored() {
        let a = args(&["x", "--model"]);
        assert_eq!(ServerConfig::resolve(&a, |_| None).model_path, PathBuf::from(DEFAULT_MODEL_PATH));
        assert!(has_flag(&a, "--model"));
    }
}
