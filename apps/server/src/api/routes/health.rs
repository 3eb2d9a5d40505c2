use crate::api::handlers::health;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}
