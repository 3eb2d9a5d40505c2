//! Custom Axum extractors.

use axum::{
    async_trait,
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::Error;

/// JSON body extractor whose failures render as the API's `{"error": ...}`
/// body with status 400, instead of axum's plain-text rejections.
///
/// A missing `Content-Type` is accepted; any other media type than JSON is not.
pub struct ApiJson<T>(pub T);

fn is_json_media_type(content_type: &str) -> bool {
    let media_type = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    media_type == "application/json" || media_type.ends_with("+json")
}

#[async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(content_type) = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
        {
            if !is_json_media_type(content_type) {
                return Err(Error::Validation(format!(
                    "Unsupported content type: {content_type}"
                )));
            }
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| Error::Validation(format!("Failed to read request body: {}", e)))?;

        serde_json::from_slice(&bytes)
            .map(ApiJson)
            .map_err(|e| Error::Validation(format!("Invalid JSON in request body: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_media_types_are_recognized() {
        assert!(is_json_media_type("application/json"));
        assert!(is_json_media_type("application/json; charset=utf-8"));
        assert!(is_json_media_type("application/problem+json"));
        assert!(!is_json_media_type("text/plain"));
    }
}
