//! Error types for holdings models

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Unsupported sort column: {0}")]
    InvalidSortColumn(String),

    #[error("Unsupported sort direction: {0} (expected ascending or descending)")]
    InvalidSortDirection(String),
}

pub type Result<T> = std::result::Result<T, Error>;
