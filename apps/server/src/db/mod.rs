//! Database layer: the search query builder and the stores that run it

pub mod memory;
pub mod search;
pub mod store;
pub mod traits;

pub use memory::InMemoryInvestmentStore;
pub use search::{PageWindow, SearchQuery};
pub use store::PostgresInvestmentStore;
pub use traits::InvestmentStore;
