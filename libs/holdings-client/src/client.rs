//! HTTP client for `POST /api/search`

use crate::error::{Error, Result};
use holdings_models::{ErrorBody, SearchRequest, SearchResult};
use reqwest::{Client, StatusCode};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Clone)]
pub struct HoldingsClient {
    client: Client,
    base_url: String,
}

impl HoldingsClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Use a preconfigured `reqwest::Client` (proxies, custom timeouts).
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self) -> String {
        format!("{}/api/search", self.base_url)
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        let url = self.search_url();
        tracing::debug!(
            url = %url,
            page_number = request.page_number,
            sort_column = %request.sort_column,
            "Sending search request"
        );

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message: api_error_message(status, &body),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

fn api_error_message(status: StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(error) => error.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("Request failed")
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_message_prefers_the_error_body() {
        let message = api_error_message(
            StatusCode::BAD_REQUEST,
            r#"{"error":"Validation error: Unsupported sort column: x"}"#,
        );
        assert_eq!(message, "Validation error: Unsupported sort column: x");
    }

    #[test]
    fn error_message_falls_back_to_status_text() {
        assert_eq!(
            api_error_message(StatusCode::BAD_GATEWAY, "<html>upstream</html>"),
            "Bad Gateway"
        );
    }

    #[test]
    fn base_url_is_normalized() {
        let client = HoldingsClient::new("http://holdings.internal:8080/").unwrap();
        assert_eq!(client.base_url(), "http://holdings.internal:8080");
        assert_eq!(client.search_url(), "http://holdings.internal:8080/api/search");
    }
}
