//! Search over the `current_investments` view.
//!
//! Request validation ([`params`]), phrase normalization ([`phrase`]), and SQL
//! construction ([`query_builder`]).

pub(crate) mod escape;
pub mod params;
pub mod phrase;
pub mod query_builder;

pub use params::{PageWindow, SearchQuery, TextFilter, TextFilterField};
pub use phrase::PhraseQuery;
pub use query_builder::{BindValue, QueryBuilder};
