//! PostgreSQL-backed investment store

use crate::db::search::{BindValue, PageWindow, QueryBuilder, SearchQuery};
use crate::db::traits::InvestmentStore;
use crate::Result;
use async_trait::async_trait;
use holdings_models::InvestmentRecord;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::{Query, QueryScalar};
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Row};
use std::time::Instant;

#[derive(Clone)]
pub struct PostgresInvestmentStore {
    pool: PgPool,
}

impl PostgresInvestmentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn bind_all<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    bind_values: Vec<BindValue>,
) -> Query<'q, Postgres, PgArguments> {
    for value in bind_values {
        query = match value {
            BindValue::Text(v) => query.bind(v),
            BindValue::BigInt(v) => query.bind(v),
        };
    }
    query
}

fn bind_all_scalar<'q>(
    mut query: QueryScalar<'q, Postgres, i64, PgArguments>,
    bind_values: Vec<BindValue>,
) -> QueryScalar<'q, Postgres, i64, PgArguments> {
    for value in bind_values {
        query = match value {
            BindValue::Text(v) => query.bind(v),
            BindValue::BigInt(v) => query.bind(v),
        };
    }
    query
}

fn observe(query_type: &str, start: Instant, ok: bool) {
    crate::metrics::DB_QUERY_DURATION_SECONDS
        .with_label_values(&[query_type])
        .observe(start.elapsed().as_secs_f64());
    if !ok {
        crate::metrics::DB_QUERY_ERRORS_TOTAL
            .with_label_values(&[query_type])
            .inc();
    }
}

/// Map one projected row. The former-names JSON array may hold nulls from
/// the view's outer join; those are dropped.
fn record_from_row(row: &PgRow) -> std::result::Result<InvestmentRecord, sqlx::Error> {
    let former_names: Json<Vec<Option<String>>> = row.try_get("investor_former_names")?;
    let other_names: Vec<Option<String>> = row.try_get("other_investor_names")?;

    Ok(InvestmentRecord {
        stock_id: row.try_get("stock_id")?,
        investor_cik: row.try_get("investor_cik")?,
        investor_name: row.try_get("investor_name")?,
        investor_former_names: former_names.0.into_iter().flatten().collect(),
        investor_country: row.try_get("investor_country")?,
        investor_region: row.try_get("investor_region")?,
        other_investor_names: other_names.into_iter().flatten().collect(),
        form_accession_number: row.try_get("form_accession_number")?,
        form_report_date: row.try_get("form_report_date")?,
        form_filing_date: row.try_get("form_filing_date")?,
        stock_issuer: row.try_get("stock_issuer")?,
        stock_cusip: row.try_get("stock_cusip")?,
        stock_ticker: row.try_get("stock_ticker")?,
        stock_value_x1000: row.try_get("stock_value_x1000")?,
        stock_shares_prn_amt: row.try_get("stock_shares_prn_amt")?,
        stock_sh_prn: row.try_get("stock_sh_prn")?,
        stock_voting_auth_sole: row.try_get("stock_voting_auth_sole")?,
        stock_voting_auth_shared: row.try_get("stock_voting_auth_shared")?,
        stock_voting_auth_none: row.try_get("stock_voting_auth_none")?,
        form_url: row.try_get("form_url")?,
    })
}

#[async_trait]
impl InvestmentStore for PostgresInvestmentStore {
    async fn fetch(
        &self,
        query: &SearchQuery,
        window: Option<PageWindow>,
    ) -> Result<Vec<InvestmentRecord>> {
        let (sql, bind_values) = QueryBuilder::new(query).build_sql(window);
        tracing::trace!(sql = %sql, binds = bind_values.len(), "Executing search query");

        let start = Instant::now();
        let rows = bind_all(sqlx::query(&sql), bind_values)
            .fetch_all(&self.pool)
            .await;
        observe("search", start, rows.is_ok());
        let rows = rows.map_err(crate::Error::Database)?;

        rows.iter()
            .map(record_from_row)
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(crate::Error::Database)
    }

    async fn count(&self, query: &SearchQuery) -> Result<u64> {
        let (sql, bind_values) = QueryBuilder::new(query).build_count_sql();

        let start = Instant::now();
        let total = bind_all_scalar(sqlx::query_scalar::<_, i64>(&sql), bind_values)
            .fetch_one(&self.pool)
            .await;
        observe("count", start, total.is_ok());
        let total = total.map_err(crate::Error::Database)?;

        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn ping(&self) -> Result<()> {
        let start = Instant::now();
        let result = sqlx::query("SELECT 1").execute(&self.pool).await;
        observe("ping", start, result.is_ok());
        result.map_err(crate::Error::Database)?;
        Ok(())
    }

    fn pool_status(&self) -> Option<(u32, usize)> {
        Some((self.pool.size(), self.pool.num_idle()))
    }
}
