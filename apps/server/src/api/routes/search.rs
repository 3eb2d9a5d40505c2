//! Search API routes, nested under `/api`

use crate::api::handlers::search;
use crate::state::AppState;
use axum::{routing::post, Router};

pub fn search_routes() -> Router<AppState> {
    Router::new().route("/search", post(search::search_handler))
}
