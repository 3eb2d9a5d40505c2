pub mod assertions;
pub mod fixtures;
pub mod shared;

use anyhow::Context as _;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use futures::FutureExt as _;
use holdings_models::{InvestmentRecord, SearchRequest};
use holdings_server::{api::create_router, db::InMemoryInvestmentStore, AppState, Config};
use std::sync::Arc;
use tower::ServiceExt as _;

pub use assertions::*;
pub use fixtures::*;

/// Router over an in-memory store seeded with known rows.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub store: InMemoryInvestmentStore,
}

impl TestApp {
    pub fn new() -> Self {
        Self::new_with(standard_records(), |_| {})
    }

    pub fn new_with(records: Vec<InvestmentRecord>, configure: impl FnOnce(&mut Config)) -> Self {
        shared::init_tracing();

        let mut config = Config::default();
        configure(&mut config);

        let store = InMemoryInvestmentStore::new(records);
        let state = AppState::with_store(config, Arc::new(store.clone()));
        let router = create_router(state.clone());

        Self {
            router,
            state,
            store,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.request_with_extra_headers(method, path, body, &[])
            .await
    }

    pub async fn request_with_extra_headers(
        &self,
        method: Method,
        path: &str,
        body: Option<Bytes>,
        extra_headers: &[(&str, &str)],
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let mut request = Request::builder()
            .method(method)
            .uri(path)
            .header("host", "example.org")
            .header("accept", "application/json")
            .header("content-type", "application/json")
            .body(match body {
                Some(bytes) => Body::from(bytes),
                None => Body::empty(),
            })
            .context("build request")?;

        for (name, value) in extra_headers {
            request.headers_mut().insert(
                name.parse::<HeaderName>().context("parse header name")?,
                value.parse::<HeaderValue>().context("parse header value")?,
            );
        }

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("dispatch request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;

        Ok((status, headers, body))
    }

    pub async fn search(
        &self,
        request: &SearchRequest,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let body = serde_json::to_vec(request).context("serialize SearchRequest")?;
        self.request(Method::POST, "/api/search", Some(Bytes::from(body)))
            .await
    }
}

pub async fn with_test_app<F>(f: F) -> anyhow::Result<()>
where
    F: for<'a> FnOnce(
        &'a TestApp,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = anyhow::Result<()>> + 'a>,
    >,
{
    let app = TestApp::new();
    run(&app, f).await
}

pub async fn with_test_app_with<C, F>(
    records: Vec<InvestmentRecord>,
    configure: C,
    f: F,
) -> anyhow::Result<()>
where
    C: FnOnce(&mut Config),
    F: for<'a> FnOnce(
        &'a TestApp,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = anyhow::Result<()>> + 'a>,
    >,
{
    let app = TestApp::new_with(records, configure);
    run(&app, f).await
}

async fn run<F>(app: &TestApp, f: F) -> anyhow::Result<()>
where
    F: for<'a> FnOnce(
        &'a TestApp,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = anyhow::Result<()>> + 'a>,
    >,
{
    let result = std::panic::AssertUnwindSafe(f(app)).catch_unwind().await;
    match result {
        Ok(r) => r,
        Err(panic) => {
            tracing::error!(
                queries = app.store.query_count(),
                "test body panicked"
            );
            std::panic::resume_unwind(panic)
        }
    }
}
