//! Shared application state

use crate::config::Config;
use crate::db::{InvestmentStore, PostgresInvestmentStore};
use crate::services::{MetricsService, SearchService};
use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

/// Handler state. Cloned per request; everything inside is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn InvestmentStore>,
    pub search_service: Arc<SearchService>,
    pub metrics_service: Arc<MetricsService>,
}

impl AppState {
    /// Connect the PostgreSQL pool and wire the services over it.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        tracing::info!(
            url = %redact_database_url(&config.database.url),
            min = config.database.pool_min_size,
            max = config.database.pool_max_size,
            "Connecting to database"
        );

        let statement_timeout_ms = config.database.statement_timeout_seconds * 1000;
        let pool = PgPoolOptions::new()
            .min_connections(config.database.pool_min_size)
            .max_connections(config.database.pool_max_size)
            .acquire_timeout(Duration::from_secs(config.database.pool_timeout_seconds))
            .after_connect(move |conn, _meta| {
                Box::pin(async move {
                    let sql = format!("SET statement_timeout = {statement_timeout_ms}");
                    sqlx::query(&sql).execute(&mut *conn).await?;
                    Ok(())
                })
            })
            .connect(&config.database.url)
            .await
            .context("Failed to connect to database")?;

        tracing::info!("Database connection pool created");

        Ok(Self::with_store(
            config,
            Arc::new(PostgresInvestmentStore::new(pool)),
        ))
    }

    /// Build state over an existing store.
    pub fn with_store(config: Config, store: Arc<dyn InvestmentStore>) -> Self {
        let search_service = Arc::new(SearchService::new(store.clone(), config.search.clone()));
        let metrics_service = Arc::new(MetricsService::new(store.clone()));
        Self {
            config: Arc::new(config),
            store,
            search_service,
            metrics_service,
        }
    }
}

/// Hide credentials before a connection string reaches the logs.
fn redact_database_url(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
