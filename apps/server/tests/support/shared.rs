use std::sync::OnceLock;

/// Env var naming a PostgreSQL database the store tests may create schemas in.
pub const TEST_DATABASE_URL_VAR: &str = "HOLDINGS_TEST_DATABASE_URL";

pub fn init_tracing() {
    use tracing_subscriber::prelude::*;
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "holdings_server=info,sqlx=warn".into()),
            )
            .with(tracing_subscriber::fmt::layer().with_test_writer())
            .try_init();
    });
}

/// `HOLDINGS_TEST_DATABASE_URL`, else `database.test_database_url` from the
/// regular configuration sources.
pub fn test_database_url() -> Option<String> {
    std::env::var(TEST_DATABASE_URL_VAR)
        .ok()
        .or_else(|| {
            holdings_server::Config::load()
                .ok()
                .and_then(|config| config.database.test_database_url)
        })
        .filter(|url| !url.trim().is_empty())
}
