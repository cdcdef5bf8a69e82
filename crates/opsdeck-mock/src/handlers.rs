//! HTTP handlers for the mock dashboard API.
//!
//! Failures answer with `{ "error": "..." }` and the matching status code,
//! the same shape the client decodes.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use opsdeck_api::models::{ErrorBody, LoginRequest, LoginResponse};
use opsdeck_api::{CronJob, Environment, Identity, User};

use crate::state::{EnvData, MockState};

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorBody {
            error: message.into(),
        }),
    )
}

// ── Auth ─────────────────────────────────────────────────────────────

/// POST /api/login
pub async fn login(
    State(state): State<Arc<MockState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    tokio::time::sleep(state.options.latency).await;

    if body.password.is_empty() || !state.accepts(&body.email) {
        warn!(email = %body.email, "login refused");
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Invalid email or password",
        ));
    }

    let token = state.issue_token(&body.email);
    info!(email = %body.email, "login accepted");
    Ok(Json(LoginResponse { token }))
}

/// GET /api/me
pub async fn me(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
) -> Result<Json<Identity>, ApiError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "Missing Authorization header"))?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "Expected a Bearer token"))?;

    state
        .identity(token.trim())
        .map(Json)
        .ok_or_else(|| api_error(StatusCode::UNAUTHORIZED, "Invalid token"))
}

// ── Collections ──────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct EnvQuery {
    env: Option<String>,
}

/// Resolve `?env=`, defaulting to development when absent.
fn env_data<'a>(state: &'a MockState, query: &EnvQuery) -> Result<&'a EnvData, ApiError> {
    let env = match query.env.as_deref() {
        None | Some("") => Environment::default(),
        Some(raw) => Environment::from_str(raw).map_err(|_| {
            api_error(
                StatusCode::BAD_REQUEST,
                format!("Unknown environment: {raw}"),
            )
        })?,
    };
    debug!(%env, "serving collection");
    state.env_data(env).ok_or_else(|| {
        api_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("No fixtures for {env}"),
        )
    })
}

/// GET /api/scheduler/cron-jobs?env=
pub async fn cron_jobs(
    State(state): State<Arc<MockState>>,
    Query(query): Query<EnvQuery>,
) -> Result<Json<Arc<Vec<CronJob>>>, ApiError> {
    let data = env_data(&state, &query)?;
    tokio::time::sleep(state.options.latency).await;
    Ok(Json(Arc::clone(&data.cron_jobs)))
}

/// GET /api/users?env=
pub async fn users(
    State(state): State<Arc<MockState>>,
    Query(query): Query<EnvQuery>,
) -> Result<Json<Arc<Vec<User>>>, ApiError> {
    let data = env_data(&state, &query)?;
    tokio::time::sleep(state.options.latency).await;
    Ok(Json(Arc::clone(&data.users)))
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
