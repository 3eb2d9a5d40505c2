//! Holdings search server
//!
//! HTTP search API over institutional stock ownership reported in 13F filings:
//! - Validated search requests (filters, sort allow-list, paging)
//! - SQL construction against the `current_investments` view
//! - Exact totals with a configurable pagination strategy
//! - Structured logging, OpenTelemetry export, Prometheus metrics

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod request_context;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
