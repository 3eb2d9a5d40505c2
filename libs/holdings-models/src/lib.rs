//! Holdings search wire types
//!
//! Types crossing the HTTP boundary between the search server and its clients:
//!
//! - `request`: the search request DTO and the sort allow-list
//! - `investment`: result rows and the paged result envelope
//!
//! # Example
//!
//! ```rust
//! use holdings_models::{SearchRequest, SortColumn, SortDirection};
//!
//! let request = SearchRequest::new(SortColumn::InvestorName, SortDirection::Ascending)
//!     .with_page(2, 25);
//! assert_eq!(request.sort_column, "investor_name");
//! assert_eq!(request.page_number, 2);
//! ```

pub mod error;
pub mod investment;
pub mod request;

pub use error::{Error, Result};
pub use investment::{ErrorBody, InvestmentRecord, SearchResult};
pub use request::{SearchFilters, SearchRequest, SortColumn, SortDirection};
