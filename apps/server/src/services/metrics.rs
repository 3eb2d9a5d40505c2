//! Scrape-time metrics that are not updated on the request path

use crate::db::InvestmentStore;
use std::sync::Arc;

pub struct MetricsService {
    store: Arc<dyn InvestmentStore>,
}

impl MetricsService {
    pub fn new(store: Arc<dyn InvestmentStore>) -> Self {
        Self { store }
    }

    /// Refresh pool gauges from the store's connection pool, when it has one.
    pub fn update_db_connection_metrics(&self) {
        if let Some((size, idle)) = self.store.pool_status() {
            let idle = idle as i64;
            crate::metrics::DB_CONNECTIONS_ACTIVE.set((i64::from(size) - idle).max(0));
            crate::metrics::DB_CONNECTIONS_IDLE.set(idle);
        }
    }

    /// Metrics appended after the registry output on every scrape.
    pub fn collect_custom_metrics(&self, server_version: &str, pagination: &str) -> String {
        self.update_db_connection_metrics();

        let mut output = String::new();
        output.push_str("# HELP holdings_server_info Holdings search server information\n");
        output.push_str("# TYPE holdings_server_info gauge\n");
        output.push_str(&format!(
            "holdings_server_info{{version=\"{}\",filtered_pagination=\"{}\"}} 1\n",
            server_version, pagination
        ));
        output
    }
}
