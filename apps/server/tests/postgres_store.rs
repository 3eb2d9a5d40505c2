//! Store tests against a real PostgreSQL database.
//!
//! Run with `HOLDINGS_TEST_DATABASE_URL=postgres://... cargo test -- --ignored`.
//! Each test creates a private schema holding a `current_investments` view
//! over seeded rows, then drops it.

mod support;

use anyhow::Context as _;
use futures::FutureExt as _;
use holdings_models::{InvestmentRecord, SearchFilters, SearchRequest, SortColumn, SortDirection};
use holdings_server::config::{PaginationStrategy, SearchConfig};
use holdings_server::db::{InMemoryInvestmentStore, InvestmentStore, PostgresInvestmentStore};
use holdings_server::services::SearchService;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::Connection as _;
use std::sync::Arc;
use support::*;
use url::Url;
use uuid::Uuid;

const CREATE_TABLE: &str = r#"
CREATE TABLE investments_fixture (
    stock_id BIGINT PRIMARY KEY,
    investor_cik TEXT NOT NULL,
    investor_name TEXT NOT NULL,
    investor_former_names JSONB,
    investor_country TEXT,
    investor_region TEXT,
    other_investor_names TEXT[],
    form_accession_number TEXT NOT NULL,
    form_report_date DATE,
    form_filing_date DATE,
    stock_issuer TEXT NOT NULL,
    stock_cusip TEXT NOT NULL,
    stock_ticker TEXT,
    stock_value_x1000 BIGINT NOT NULL,
    stock_shares_prn_amt BIGINT NOT NULL,
    stock_sh_prn TEXT NOT NULL,
    stock_voting_auth_sole BIGINT,
    stock_voting_auth_shared BIGINT,
    stock_voting_auth_none BIGINT,
    form_url TEXT NOT NULL
)"#;

const CREATE_VIEW: &str = r#"
CREATE VIEW current_investments AS
SELECT
    f.*,
    to_tsvector(
        'simple',
        concat_ws(
            ' ',
            f.investor_cik,
            f.investor_name,
            f.stock_issuer,
            f.stock_cusip,
            f.stock_ticker,
            f.investor_former_names::text,
            array_to_string(f.other_investor_names, ' ')
        )
    ) AS search_document
FROM investments_fixture f"#;

const INSERT_ROW: &str = r#"
INSERT INTO investments_fixture VALUES (
    $1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
    $11, $12, $13, $14, $15, $16, $17, $18, $19, $20
)"#;

struct PgFixture {
    store: PostgresInvestmentStore,
    schema: String,
    admin_url: String,
}

fn with_search_path(database_url: &str, schema: &str) -> anyhow::Result<String> {
    let mut url = Url::parse(database_url).context("parse database URL")?;
    url.query_pairs_mut()
        .append_pair("options", &format!("-c search_path={}", schema));
    Ok(url.to_string())
}

fn parse_int(value: &str) -> anyhow::Result<i64> {
    value.parse().with_context(|| format!("parse integer {value}"))
}

fn parse_opt_int(value: &Option<String>) -> anyhow::Result<Option<i64>> {
    value.as_deref().map(parse_int).transpose()
}

async fn insert(pool: &sqlx::PgPool, record: &InvestmentRecord) -> anyhow::Result<()> {
    sqlx::query(INSERT_ROW)
        .bind(parse_int(&record.stock_id)?)
        .bind(&record.investor_cik)
        .bind(&record.investor_name)
        .bind(Json(&record.investor_former_names))
        .bind(&record.investor_country)
        .bind(&record.investor_region)
        .bind(&record.other_investor_names)
        .bind(&record.form_accession_number)
        .bind(record.form_report_date)
        .bind(record.form_filing_date)
        .bind(&record.stock_issuer)
        .bind(&record.stock_cusip)
        .bind(&record.stock_ticker)
        .bind(parse_int(&record.stock_value_x1000)?)
        .bind(parse_int(&record.stock_shares_prn_amt)?)
        .bind(&record.stock_sh_prn)
        .bind(parse_opt_int(&record.stock_voting_auth_sole)?)
        .bind(parse_opt_int(&record.stock_voting_auth_shared)?)
        .bind(parse_opt_int(&record.stock_voting_auth_none)?)
        .bind(&record.form_url)
        .execute(pool)
        .await
        .context("insert fixture row")?;
    Ok(())
}

impl PgFixture {
    async fn new(admin_url: String, records: &[InvestmentRecord]) -> anyhow::Result<Self> {
        let schema = format!("test_{}", Uuid::new_v4().simple());
        let mut admin_conn = sqlx::PgConnection::connect(&admin_url)
            .await
            .context("connect admin db for schema create")?;
        sqlx::query(&format!(r#"CREATE SCHEMA "{}""#, schema))
            .execute(&mut admin_conn)
            .await
            .context("create test schema")?;

        let pool = PgPoolOptions::new()
            .max_connections(2)
            .connect(&with_search_path(&admin_url, &schema)?)
            .await
            .context("connect test pool")?;

        sqlx::query(CREATE_TABLE).execute(&pool).await?;
        sqlx::query(CREATE_VIEW).execute(&pool).await?;
        for record in records {
            insert(&pool, record).await?;
        }

        Ok(Self {
            store: PostgresInvestmentStore::new(pool),
            schema,
            admin_url,
        })
    }

    async fn cleanup(self) -> anyhow::Result<()> {
        self.store.pool().close().await;
        let mut admin_conn = sqlx::PgConnection::connect(&self.admin_url)
            .await
            .context("connect admin db for schema drop")?;
        sqlx::query(&format!(r#"DROP SCHEMA "{}" CASCADE"#, self.schema))
            .execute(&mut admin_conn)
            .await
            .context("drop test schema")?;
        Ok(())
    }
}

async fn with_pg_fixture<F>(records: Vec<InvestmentRecord>, f: F) -> anyhow::Result<()>
where
    F: for<'a> FnOnce(
        &'a PgFixture,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = anyhow::Result<()>> + 'a>,
    >,
{
    shared::init_tracing();
    let Some(url) = shared::test_database_url() else {
        eprintln!("{} not set; skipping", shared::TEST_DATABASE_URL_VAR);
        return Ok(());
    };

    let fixture = PgFixture::new(url, &records).await?;
    let result = std::panic::AssertUnwindSafe(f(&fixture)).catch_unwind().await;
    if let Err(e) = fixture.cleanup().await {
        eprintln!("test schema cleanup failed: {e:?}");
    }

    match result {
        Ok(r) => r,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

fn requests() -> Vec<SearchRequest> {
    let filtered = |filters: SearchFilters| {
        SearchRequest::new(SortColumn::StockId, SortDirection::Ascending)
            .with_page(1, 25)
            .with_filters(filters)
    };
    vec![
        SearchRequest::new(SortColumn::StockId, SortDirection::Ascending).with_page(3, 10),
        SearchRequest::new(SortColumn::StockValueX1000, SortDirection::Descending)
            .with_page(1, 7),
        SearchRequest::new(SortColumn::InvestorCountry, SortDirection::Descending)
            .with_page(1, 25),
        SearchRequest::new(SortColumn::StockIssuer, SortDirection::Ascending).with_page(2, 4),
        filtered(SearchFilters {
            ticker: Some("aapl".to_string()),
            ..Default::default()
        }),
        filtered(SearchFilters {
            investor: Some("roadrunner".to_string()),
            ..Default::default()
        }),
        filtered(SearchFilters {
            cusip: Some("67066G".to_string()),
            issuer: Some("nvidia".to_string()),
            ..Default::default()
        }),
        filtered(SearchFilters {
            phrase: Some("  berkshire   hath ".to_string()),
            ..Default::default()
        }),
        filtered(SearchFilters {
            phrase: Some("apple inc".to_string()),
            ..Default::default()
        }),
    ]
}

#[tokio::test]
#[ignore = "requires HOLDINGS_TEST_DATABASE_URL"]
async fn postgres_store_agrees_with_in_memory_store() -> anyhow::Result<()> {
    with_pg_fixture(standard_records(), |fixture| {
        Box::pin(async move {
            let reference: Arc<dyn InvestmentStore> =
                Arc::new(InMemoryInvestmentStore::new(standard_records()));
            let expected_service = SearchService::new(reference, SearchConfig::default());

            for strategy in [PaginationStrategy::Database, PaginationStrategy::InMemory] {
                let config = SearchConfig {
                    filtered_pagination: strategy,
                    ..SearchConfig::default()
                };
                let service = SearchService::new(Arc::new(fixture.store.clone()), config);

                for request in requests() {
                    let actual = service.search(&request).await?;
                    let expected = expected_service.search(&request).await?;
                    assert_eq!(
                        actual,
                        expected,
                        "strategy {} request {:?}",
                        strategy.as_str(),
                        request
                    );
                }
            }
            Ok(())
        })
    })
    .await
}

#[tokio::test]
#[ignore = "requires HOLDINGS_TEST_DATABASE_URL"]
async fn postgres_store_pings_and_counts() -> anyhow::Result<()> {
    with_pg_fixture(standard_records(), |fixture| {
        Box::pin(async move {
            fixture.store.ping().await?;
            assert!(fixture.store.pool_status().is_some());

            let request = SearchRequest::new(SortColumn::StockId, SortDirection::Ascending);
            let query = holdings_server::db::SearchQuery::from_request(
                &request,
                &SearchConfig::default(),
            )?;
            assert_eq!(fixture.store.count(&query).await?, 25);
            Ok(())
        })
    })
    .await
}
