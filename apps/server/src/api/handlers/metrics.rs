//! Metrics endpoint handler

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use prometheus::{Encoder, TextEncoder};

use crate::state::AppState;

/// Prometheus text exposition of the default registry plus scrape-time metrics.
pub async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::error!(error = %e, "Failed to encode metrics");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            [("Content-Type", "text/plain")],
            b"Failed to encode metrics".to_vec(),
        );
    }

    let custom = state.metrics_service.collect_custom_metrics(
        env!("CARGO_PKG_VERSION"),
        state.config.search.filtered_pagination.as_str(),
    );
    buffer.extend_from_slice(custom.as_bytes());

    (
        StatusCode::OK,
        [("Content-Type", "text/plain; version=0.0.4; charset=utf-8")],
        buffer,
    )
}
