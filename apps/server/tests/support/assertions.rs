use anyhow::Context as _;
use axum::body::Bytes;
use axum::http::StatusCode;
use holdings_models::{ErrorBody, SearchResult};

pub fn assert_status(actual: StatusCode, expected: StatusCode, context: &str) {
    assert_eq!(actual, expected, "unexpected status for {context}");
}

pub fn parse_result(body: &Bytes) -> anyhow::Result<SearchResult> {
    serde_json::from_slice(body).context("parse SearchResult body")
}

/// Parse an error body and return its message.
pub fn error_message(body: &Bytes) -> anyhow::Result<String> {
    let error: ErrorBody = serde_json::from_slice(body).context("parse error body")?;
    Ok(error.error)
}

pub fn stock_ids(result: &SearchResult) -> Vec<&str> {
    result.rows.iter().map(|r| r.stock_id.as_str()).collect()
}
