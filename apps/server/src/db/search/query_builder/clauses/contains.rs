use crate::db::search::escape::contains_pattern;
use crate::db::search::params::{TextFilter, TextFilterField};

use super::super::bind::push_text;
use super::super::BindValue;

/// SQL expression a text filter is matched against.
fn filter_expr(field: TextFilterField) -> &'static str {
    match field {
        TextFilterField::Cik => "ci.investor_cik::text",
        TextFilterField::Cusip => "ci.stock_cusip",
        TextFilterField::Ticker => "COALESCE(ci.stock_ticker, '')",
        TextFilterField::Issuer => "ci.stock_issuer",
        TextFilterField::Investor => {
            "concat_ws(' ', ci.investor_name, ci.investor_former_names::text)"
        }
    }
}

/// `<expr> ILIKE '%value%'` with LIKE metacharacters in the value escaped.
pub(in crate::db::search::query_builder) fn build_contains_clause(
    filter: &TextFilter,
    bind_params: &mut Vec<BindValue>,
) -> String {
    let idx = push_text(bind_params, contains_pattern(&filter.value));
    format!(
        "{} ILIKE ${} ESCAPE E'\\\\'",
        filter_expr(filter.field),
        idx
    )
}
