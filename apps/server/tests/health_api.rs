mod support;

use axum::http::{Method, StatusCode};
use serde_json::Value;
use support::*;

#[tokio::test]
async fn liveness_reports_service_name() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, _, body) = app.request(Method::GET, "/health", None).await?;
            assert_status(status, StatusCode::OK, "health");
            let value: Value = serde_json::from_slice(&body)?;
            assert_eq!(value["status"], "ok");
            assert_eq!(value["service"], "holdings-server");
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn readiness_pings_the_store() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, _, body) = app.request(Method::GET, "/health/ready", None).await?;
            assert_status(status, StatusCode::OK, "readiness");
            let value: Value = serde_json::from_slice(&body)?;
            assert_eq!(value["status"], "ready");
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn root_reports_version() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            let (status, _, body) = app.request(Method::GET, "/", None).await?;
            assert_status(status, StatusCode::OK, "root");
            let value: Value = serde_json::from_slice(&body)?;
            assert_eq!(value["version"], env!("CARGO_PKG_VERSION"));

            let (status, _, _) = app.request(Method::GET, "/favicon.ico", None).await?;
            assert_status(status, StatusCode::NO_CONTENT, "favicon");

            let (status, _, _) = app.request(Method::GET, "/nope", None).await?;
            assert_status(status, StatusCode::NOT_FOUND, "unknown route");
            Ok(())
        })
    })
    .await
}

#[tokio::test]
async fn metrics_expose_http_and_server_info() -> anyhow::Result<()> {
    with_test_app(|app| {
        Box::pin(async move {
            app.request(Method::GET, "/health", None).await?;

            let (status, headers, body) = app.request(Method::GET, "/metrics", None).await?;
            assert_status(status, StatusCode::OK, "metrics");
            assert!(headers
                .get("content-type")
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| v.starts_with("text/plain")));

            let text = String::from_utf8(body.to_vec())?;
            assert!(text.contains("holdings_http_requests_total"));
            assert!(text.contains("holdings_server_info{"));
            assert!(text.contains("filtered_pagination=\"database\""));
            Ok(())
        })
    })
    .await
}
