use crate::db::search::phrase::PhraseQuery;

use super::super::bind::push_text;
use super::super::BindValue;

/// Match the view's precomputed `search_document` against a prefix-AND tsquery.
pub(in crate::db::search::query_builder) fn build_phrase_clause(
    phrase: &PhraseQuery,
    bind_params: &mut Vec<BindValue>,
) -> String {
    let idx = push_text(bind_params, phrase.to_tsquery());
    format!("ci.search_document @@ to_tsquery('simple', ${})", idx)
}
