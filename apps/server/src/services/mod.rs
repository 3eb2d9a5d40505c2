//! Application services sitting between handlers and the store

pub mod metrics;
pub mod search;

pub use metrics::MetricsService;
pub use search::SearchService;
