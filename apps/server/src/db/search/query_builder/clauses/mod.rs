//! WHERE clause builders, one per filter kind.

mod contains;
mod fulltext;

pub(in crate::db::search::query_builder) use contains::build_contains_clause;
pub(in crate::db::search::query_builder) use fulltext::build_phrase_clause;
