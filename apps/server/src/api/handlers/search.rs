//! `POST /api/search`

use crate::api::extractors::ApiJson;
use crate::request_context::RequestContext;
use crate::{state::AppState, Result};
use axum::{extract::State, Extension, Json};
use holdings_models::{SearchRequest, SearchResult};

/// Run one search and return the requested page with the exact total.
pub async fn search_handler(
    State(state): State<AppState>,
    context: Option<Extension<RequestContext>>,
    ApiJson(request): ApiJson<SearchRequest>,
) -> Result<Json<SearchResult>> {
    let request_id = context
        .as_ref()
        .map(|Extension(ctx)| ctx.request_id.as_str())
        .unwrap_or("-");

    match state.search_service.search(&request).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            tracing::debug!(
                request_id,
                sort_column = %request.sort_column,
                error = %e,
                "Search failed"
            );
            Err(e)
        }
    }
}
