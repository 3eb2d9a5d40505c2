//! Prometheus metrics for the holdings search server.
//!
//! Everything registers into the default registry; `GET /metrics` gathers it.

use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, register_int_gauge, register_int_gauge_vec,
    HistogramVec, IntCounterVec, IntGauge, IntGaugeVec,
};

lazy_static! {
    // HTTP Request Metrics

    /// Total HTTP requests by method, path, and status
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "holdings_http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .expect("Failed to register HTTP_REQUESTS_TOTAL");

    /// HTTP request duration in seconds
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "holdings_http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .expect("Failed to register HTTP_REQUEST_DURATION_SECONDS");

    pub static ref HTTP_REQUESTS_IN_FLIGHT: IntGaugeVec = register_int_gauge_vec!(
        "holdings_http_requests_in_flight",
        "Number of HTTP requests currently being processed",
        &["method", "path"]
    )
    .expect("Failed to register HTTP_REQUESTS_IN_FLIGHT");

    // Search Metrics

    /// Searches by outcome and by the pagination path taken
    pub static ref SEARCH_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "holdings_search_requests_total",
        "Total number of search requests",
        &["strategy", "status"]
    )
    .expect("Failed to register SEARCH_REQUESTS_TOTAL");

    pub static ref SEARCH_ROWS_RETURNED: HistogramVec = register_histogram_vec!(
        "holdings_search_rows_returned",
        "Number of rows returned in one page of results",
        &["strategy"],
        vec![0.0, 1.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0]
    )
    .expect("Failed to register SEARCH_ROWS_RETURNED");

    // Database Metrics

    /// Database query duration
    pub static ref DB_QUERY_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "holdings_db_query_duration_seconds",
        "Database query duration in seconds",
        &["query_type"],
        vec![0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5, 1.0, 5.0, 10.0]
    )
    .expect("Failed to register DB_QUERY_DURATION_SECONDS");

    pub static ref DB_QUERY_ERRORS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "holdings_db_query_errors_total",
        "Total number of database query errors",
        &["query_type"]
    )
    .expect("Failed to register DB_QUERY_ERRORS_TOTAL");

    pub static ref DB_CONNECTIONS_ACTIVE: IntGauge = register_int_gauge!(
        "holdings_db_connections_active",
        "Number of active database connections"
    )
    .expect("Failed to register DB_CONNECTIONS_ACTIVE");

    pub static ref DB_CONNECTIONS_IDLE: IntGauge = register_int_gauge!(
        "holdings_db_connections_idle",
        "Number of idle database connections"
    )
    .expect("Failed to register DB_CONNECTIONS_IDLE");
}

/// Collapse paths into a bounded label set.
///
/// Known routes keep their path; anything else becomes `/other` so scanners
/// hitting random URLs cannot blow up label cardinality.
pub fn sanitize_path(path: &str) -> String {
    let trimmed = path.trim_end_matches('/');
    let path = if trimmed.is_empty() { "/" } else { trimmed };

    match path {
        "/" | "/health" | "/health/ready" | "/metrics" | "/favicon.ico" | "/api/search" => {
            path.to_string()
        }
        _ => "/other".to_string(),
    }
}

/// Outcome label for a search result.
pub fn status_label<T, E>(result: &Result<T, E>) -> &'static str {
    if result.is_ok() {
        "success"
    } else {
        "error"
    }
}
