//!
//! HealthQAI HTTP server
//! ---------------------
//! Axum routes for the health probe, symptom prediction, token login and the current-user
//! lookup. Everything handlers need lives in one immutable [`AppContext`] built at startup
//! and shared behind an `Arc`; nothing is mutated after that, so handlers take no locks.
//!
//! Routes:
//! - `GET  /`           health probe: `{status, model_loaded}`
//! - `POST /predict`    form: age, gender, symptoms, medical_history?
//! - `POST /token`      form: username, password -> `{access_token, token_type}`
//! - `GET  /users/me/`  bearer-protected account summary (also without the trailing slash)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowHeaders, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::error::{AppError, AppResult};
use crate::identity::{AuthProvider, CredentialStore, LocalAuthProvider, LoginRequest, LoginResponse, TokenIssuer, UserView};
use crate::prediction::{PredictForm, PredictionEngine, PredictionRequest, PredictionResponse};

pub mod bearer;

pub use bearer::CurrentUser;

pub const STATUS_RUNNING: &str = "HealthQAI Backend is running";

/// Startup-built, read-only state shared by all handlers.
pub struct AppContext {
    pub auth: LocalAuthProvider,
    pub engine: PredictionEngine,
    pub config: ServerConfig,
}

pub type AppState = Arc<AppContext>;

impl AppContext {
    pub fn new(auth: LocalAuthProvider, engine: PredictionEngine, config: ServerConfig) -> Self {
        Self { auth, engine, config }
    }

    /// Load accounts and the model, and generate this process's token secret.
    pub fn from_config(config: ServerConfig) -> anyhow::Result<Self> {
        let store = match &config.users_file {
            Some(path) => CredentialStore::load(path)?,
            None => {
                warn!(target: "startup", "no users file configured; using built-in demo accounts");
                CredentialStore::with_demo_accounts().context("seeding demo accounts")?
            }
        };
        let issuer = TokenIssuer::generate()?;
        let auth = LocalAuthProvider::new(store, issuer, config.token_ttl());
        let engine = PredictionEngine::load(&config.model_path);
        Ok(Self::new(auth, engine, config))
    }
}

fn cors_layer(origin: &str) -> anyhow::Result<CorsLayer> {
    let origin = HeaderValue::from_str(origin)
        .with_context(|| format!("invalid CORS origin '{}'", origin))?;
    // Credentialed CORS cannot use wildcards, so headers are mirrored from the preflight.
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request()))
}

pub fn build_router(state: AppState) -> anyhow::Result<Router> {
    let cors = cors_layer(&state.config.cors_origin)?;
    Ok(Router::new()
        .route("/", get(health))
        .route("/predict", post(predict))
        .route("/token", post(token))
        .route("/users/me/", get(read_users_me))
        .route("/users/me", get(read_users_me))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn log_startup(config: &ServerConfig) {
    let cwd = std::env::current_dir().ok();
    info!(
        target: "startup",
        "HealthQAI starting: cwd={:?}, bind={}:{}, model={:?}, users_file={:?}, cors_origin={}, token_ttl_mins={}",
        cwd, config.bind, config.http_port, config.model_path, config.users_file, config.cors_origin, config.token_ttl_mins
    );
}

pub async fn run_with_config(config: ServerConfig) -> anyhow::Result<()> {
    log_startup(&config);
    let addr: SocketAddr = format!("{}:{}", config.bind, config.http_port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.bind, config.http_port))?;
    let ctx = AppContext::from_config(config)?;
    info!(target: "startup", accounts = ctx.auth.store.len(), model_loaded = ctx.engine.model_loaded(), "context ready");
    let app = build_router(Arc::new(ctx))?;

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await
        .with_context(|| format!("binding {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown requested");
        })
        .await?;
    Ok(())
}

/// Convenience entry point using defaults (port 8000, `models/symptom_model.json`).
pub async fn run() -> anyhow::Result<()> {
    run_with_config(ServerConfig::default()).await
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub model_loaded: bool,
}

async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus { status: STATUS_RUNNING.to_string(), model_loaded: state.engine.model_loaded() })
}

fn form_rejection(rej: FormRejection) -> AppError {
    AppError::validation("bad_input".to_string(), rej.body_text())
}

async fn predict(
    State(state): State<AppState>,
    form: Result<Form<PredictForm>, FormRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let Form(form) = form.map_err(form_rejection)?;
    let req = PredictionRequest::try_from(form)?;
    // Model inference is synchronous; keep it off the async workers.
    let st = state.clone();
    match tokio::task::spawn_blocking(move || st.engine.predict(&req)).await {
        Ok(resp) => Ok(Json(resp)),
        Err(e) => {
            error!(target: "healthqai::predict", "prediction task failed: {e}");
            Err(AppError::internal("internal_error".to_string(), e.to_string()))
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenForm {
    username: String,
    password: String,
}

async fn token(
    State(state): State<AppState>,
    form: Result<Form<TokenForm>, FormRejection>,
) -> AppResult<Json<LoginResponse>> {
    let Form(form) = form.map_err(form_rejection)?;
    let req = LoginRequest { username: form.username, password: form.password };
    // Argon2 verification is deliberately expensive.
    let st = state.clone();
    match tokio::task::spawn_blocking(move || st.auth.login(&req)).await {
        Ok(res) => res.map(Json),
        Err(e) => {
            error!(target: "healthqai::auth", "login task failed: {e}");
            Err(AppError::internal("internal_error".to_string(), e.to_string()))
        }
    }
}

async fn read_users_me(CurrentUser(cred): CurrentUser) -> Json<UserView> {
    Json(UserView::from(&cred))
}
