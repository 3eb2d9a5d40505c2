//! Search service: validation, pagination policy, and totals.
//!
//! Every request is validated into a [`SearchQuery`] before the store is
//! touched. Paging then follows one process-wide policy:
//! - no filters: windowed fetch plus an unfiltered count
//! - filters, `database` strategy: windowed fetch plus a filtered count
//! - filters, `in_memory` strategy: one unpaged fetch, sliced here; the total
//!   is the length of the full result

use crate::config::{PaginationStrategy, SearchConfig};
use crate::db::{InvestmentStore, SearchQuery};
use crate::Result;
use holdings_models::{SearchRequest, SearchResult};
use std::sync::Arc;
use std::time::Instant;

pub struct SearchService {
    store: Arc<dyn InvestmentStore>,
    config: SearchConfig,
}

impl SearchService {
    pub fn new(store: Arc<dyn InvestmentStore>, config: SearchConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Run one search. Fails with `Validation` before any query when the
    /// request is malformed, or `Database` when the store fails.
    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        let query = SearchQuery::from_request(request, &self.config)?;

        let strategy = if query.has_filters() {
            self.config.filtered_pagination
        } else {
            PaginationStrategy::Database
        };

        let start = Instant::now();
        let result = match strategy {
            PaginationStrategy::Database => self.search_paged(&query).await,
            PaginationStrategy::InMemory => self.search_sliced(&query).await,
        };

        crate::metrics::SEARCH_REQUESTS_TOTAL
            .with_label_values(&[strategy.as_str(), crate::metrics::status_label(&result)])
            .inc();

        let result = result?;
        crate::metrics::SEARCH_ROWS_RETURNED
            .with_label_values(&[strategy.as_str()])
            .observe(result.rows.len() as f64);

        tracing::debug!(
            has_filters = query.has_filters(),
            strategy = strategy.as_str(),
            sort_column = %query.sort_column,
            sort_direction = %query.sort_direction,
            page_number = query.page_number,
            page_size = query.page_size,
            rows = result.rows.len(),
            total_matching = result.total_matching,
            duration_ms = start.elapsed().as_millis() as u64,
            "Search completed"
        );

        Ok(result)
    }

    async fn search_paged(&self, query: &SearchQuery) -> Result<SearchResult> {
        let rows = self.store.fetch(query, Some(query.window())).await?;
        let total_matching = self.store.count(query).await?;
        Ok(SearchResult {
            rows,
            total_matching,
        })
    }

    async fn search_sliced(&self, query: &SearchQuery) -> Result<SearchResult> {
        let all_rows = self.store.fetch(query, None).await?;
        if all_rows.len() > self.config.in_memory_warn_rows {
            tracing::warn!(
                rows = all_rows.len(),
                threshold = self.config.in_memory_warn_rows,
                "Filtered search fetched a large result set for in-memory paging"
            );
        }

        let total_matching = all_rows.len() as u64;
        Ok(SearchResult {
            rows: query.window().slice(all_rows),
            total_matching,
        })
    }
}
