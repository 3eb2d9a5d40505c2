//! Storage seam for investment searches

use crate::db::search::{PageWindow, SearchQuery};
use crate::Result;
use async_trait::async_trait;
use holdings_models::InvestmentRecord;

/// Read-only access to the `current_investments` projection.
///
/// Implementations apply the query's filters and ordering themselves; the
/// caller decides whether paging happens in the store (a window) or after.
#[async_trait]
pub trait InvestmentStore: Send + Sync {
    /// Matching rows in sort order. `None` returns every match.
    async fn fetch(
        &self,
        query: &SearchQuery,
        window: Option<PageWindow>,
    ) -> Result<Vec<InvestmentRecord>>;

    /// Number of rows matching the query's filters.
    async fn count(&self, query: &SearchQuery) -> Result<u64>;

    /// Round trip used by readiness checks.
    async fn ping(&self) -> Result<()>;

    /// `(size, idle)` of the backing connection pool, if there is one.
    fn pool_status(&self) -> Option<(u32, usize)> {
        None
    }
}
