//! Holdings search client
//!
//! - [`HoldingsClient`]: HTTP client for `POST /api/search`
//! - [`SearchController`]: view state for a search screen with debounced
//!   text input and stale-response discard
//! - [`format`]: display helpers for result rows
//!
//! # Example
//!
//! ```rust,no_run
//! use holdings_client::{ControllerConfig, HoldingsClient, SearchController};
//!
//! # async fn run() -> holdings_client::Result<()> {
//! let client = HoldingsClient::new("http://localhost:8080")?;
//! let controller = SearchController::new(client, ControllerConfig::from_env());
//! controller.mount().await.ok();
//! controller.set_search_text("berkshire apple");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod controller;
pub mod error;
pub mod format;

pub use client::{HoldingsClient, DEFAULT_BASE_URL};
pub use controller::{
    ControllerConfig, DisplayState, FilterField, SearchBackend, SearchController, ViewState,
};
pub use error::{Error, Result};
