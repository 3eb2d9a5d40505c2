//! Route tables, merged into the main router by [`crate::api::create_router`]

pub mod health;
pub mod metrics;
pub mod search;
