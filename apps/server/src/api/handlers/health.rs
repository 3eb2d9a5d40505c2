//! Liveness, readiness, and informational endpoints

use crate::error::{Error, Result};
use crate::state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::{json, Value};

const SERVICE_NAME: &str = "holdings-server";

/// Liveness: the process is serving requests.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": SERVICE_NAME
    }))
}

/// Readiness: the store answers a trivial query.
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<Value>> {
    state.store.ping().await.map_err(|e| {
        tracing::warn!(error = %e, "Readiness check failed");
        Error::Unavailable("database is not reachable".to_string())
    })?;

    Ok(Json(json!({
        "status": "ready",
        "service": SERVICE_NAME
    })))
}

pub async fn root() -> impl IntoResponse {
    Json(json!({
        "service": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running"
    }))
}

/// 204 so browsers probing for an icon do not fill the logs with 404s.
pub async fn favicon() -> impl IntoResponse {
    StatusCode::NO_CONTENT
}
