//! SQL builder for the `current_investments` search.
//!
//! Produces one parameterized statement per request:
//! - a row query with the validated filters, a total `ORDER BY`, and an
//!   optional `LIMIT/OFFSET` window
//! - a `COUNT(*)` query sharing the same predicates
//!
//! User text only ever reaches the database as bind parameters. The ORDER BY
//! column comes from [`SortColumn::as_str`], never from the request.

use super::params::{PageWindow, SearchQuery};
use holdings_models::SortColumn;

mod bind;
mod clauses;

use bind::push_big_int;

/// Bind values for `sqlx` queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindValue {
    Text(String),
    BigInt(i64),
}

/// Row projection. Integer columns are cast to text; list columns never come back NULL.
const SELECT_COLUMNS: &str = "ci.stock_id::text AS stock_id, \
ci.investor_cik::text AS investor_cik, \
ci.investor_name, \
COALESCE(ci.investor_former_names, '[]'::jsonb) AS investor_former_names, \
ci.investor_country, \
ci.investor_region, \
COALESCE(ci.other_investor_names, ARRAY[]::text[]) AS other_investor_names, \
ci.form_accession_number, \
ci.form_report_date, \
ci.form_filing_date, \
ci.stock_issuer, \
ci.stock_cusip, \
COALESCE(ci.stock_ticker, '') AS stock_ticker, \
ci.stock_value_x1000::text AS stock_value_x1000, \
ci.stock_shares_prn_amt::text AS stock_shares_prn_amt, \
ci.stock_sh_prn, \
ci.stock_voting_auth_sole::text AS stock_voting_auth_sole, \
ci.stock_voting_auth_shared::text AS stock_voting_auth_shared, \
ci.stock_voting_auth_none::text AS stock_voting_auth_none, \
ci.form_url";

const FROM_VIEW: &str = " FROM current_investments ci";

pub struct QueryBuilder<'a> {
    query: &'a SearchQuery,
}

impl<'a> QueryBuilder<'a> {
    pub fn new(query: &'a SearchQuery) -> Self {
        Self { query }
    }

    /// Row query. `None` returns every matching row in sort order.
    pub fn build_sql(&self, window: Option<PageWindow>) -> (String, Vec<BindValue>) {
        let mut bind_params = Vec::new();
        let mut sql = format!("SELECT {SELECT_COLUMNS}{FROM_VIEW}");

        self.push_where(&mut sql, &mut bind_params);
        self.push_order_by(&mut sql);

        if let Some(window) = window {
            let limit_idx = push_big_int(&mut bind_params, clamp_i64(window.limit));
            let offset_idx = push_big_int(&mut bind_params, clamp_i64(window.offset));
            sql.push_str(&format!(" LIMIT ${limit_idx} OFFSET ${offset_idx}"));
        }

        (sql, bind_params)
    }

    pub fn build_count_sql(&self) -> (String, Vec<BindValue>) {
        let mut bind_params = Vec::new();
        let mut sql = format!("SELECT COUNT(*){FROM_VIEW}");
        self.push_where(&mut sql, &mut bind_params);
        (sql, bind_params)
    }

    fn push_where(&self, sql: &mut String, bind_params: &mut Vec<BindValue>) {
        let mut predicates: Vec<String> = self
            .query
            .text_filters
            .iter()
            .map(|filter| clauses::build_contains_clause(filter, bind_params))
            .collect();

        if let Some(phrase) = &self.query.phrase {
            predicates.push(clauses::build_phrase_clause(phrase, bind_params));
        }

        if !predicates.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&predicates.join(" AND "));
        }
    }

    fn push_order_by(&self, sql: &mut String) {
        let column = self.query.sort_column;
        let dir = self.query.sort_direction.as_sql();

        // Qualified names sort on the view's own types, not the text projection.
        sql.push_str(&format!(" ORDER BY ci.{} {dir} NULLS LAST", column.as_str()));

        // stock_id makes the order total so pages never overlap.
        if column != SortColumn::StockId {
            sql.push_str(&format!(", ci.stock_id {dir}"));
        }
    }
}

fn clamp_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use holdings_models::{SearchFilters, SearchRequest, SortDirection};

    fn query(filters: SearchFilters, column: SortColumn, dir: SortDirection) -> SearchQuery {
        let request = SearchRequest::new(column, dir)
            .with_filters(filters)
            .with_page(3, 10);
        SearchQuery::from_request(&request, &SearchConfig::default()).unwrap()
    }

    #[test]
    fn unfiltered_query_has_no_where_and_pages_in_sql() {
        let q = query(
            SearchFilters::default(),
            SortColumn::InvestorName,
            SortDirection::Ascending,
        );
        let (sql, binds) = QueryBuilder::new(&q).build_sql(Some(q.window()));

        assert!(sql.starts_with("SELECT ci.stock_id::text AS stock_id"));
        assert!(!sql.contains("WHERE"));
        assert!(sql.ends_with(
            "ORDER BY ci.investor_name ASC NULLS LAST, ci.stock_id ASC LIMIT $1 OFFSET $2"
        ));
        assert_eq!(binds, vec![BindValue::BigInt(10), BindValue::BigInt(20)]);
    }

    #[test]
    fn filters_are_joined_with_and_in_bind_order() {
        let q = query(
            SearchFilters {
                cusip: Some("037833".to_string()),
                issuer: Some("apple".to_string()),
                phrase: Some("berkshire hath".to_string()),
                ..Default::default()
            },
            SortColumn::StockValueX1000,
            SortDirection::Descending,
        );
        let (sql, binds) = QueryBuilder::new(&q).build_sql(Some(q.window()));

        assert!(sql.contains(
            " WHERE ci.stock_cusip ILIKE $1 ESCAPE E'\\\\' AND ci.stock_issuer ILIKE $2 ESCAPE E'\\\\' AND ci.search_document @@ to_tsquery('simple', $3)"
        ));
        assert!(sql.contains("ORDER BY ci.stock_value_x1000 DESC NULLS LAST, ci.stock_id DESC"));
        assert!(sql.ends_with("LIMIT $4 OFFSET $5"));
        assert_eq!(
            binds,
            vec![
                BindValue::Text("%037833%".to_string()),
                BindValue::Text("%apple%".to_string()),
                BindValue::Text("berkshire & hath:*".to_string()),
                BindValue::BigInt(10),
                BindValue::BigInt(20),
            ]
        );
    }

    #[test]
    fn count_query_shares_predicates_without_order_or_window() {
        let q = query(
            SearchFilters {
                ticker: Some("AAPL".to_string()),
                ..Default::default()
            },
            SortColumn::StockTicker,
            SortDirection::Ascending,
        );
        let (sql, binds) = QueryBuilder::new(&q).build_count_sql();

        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM current_investments ci WHERE COALESCE(ci.stock_ticker, '') ILIKE $1 ESCAPE E'\\\\'"
        );
        assert_eq!(binds, vec![BindValue::Text("%AAPL%".to_string())]);
    }

    #[test]
    fn unpaged_query_omits_limit() {
        let q = query(
            SearchFilters {
                investor: Some("acme".to_string()),
                ..Default::default()
            },
            SortColumn::InvestorName,
            SortDirection::Ascending,
        );
        let (sql, binds) = QueryBuilder::new(&q).build_sql(None);
        assert!(!sql.contains("LIMIT"));
        assert_eq!(binds.len(), 1);
    }

    #[test]
    fn sorting_by_stock_id_has_no_duplicate_tiebreaker() {
        let q = query(
            SearchFilters::default(),
            SortColumn::StockId,
            SortDirection::Descending,
        );
        let (sql, _) = QueryBuilder::new(&q).build_sql(None);
        assert!(sql.ends_with("ORDER BY ci.stock_id DESC NULLS LAST"));
    }

    #[test]
    fn filter_text_never_reaches_sql() {
        let injection = "'; DROP TABLE filings; --";
        let q = query(
            SearchFilters {
                issuer: Some(injection.to_string()),
                phrase: Some(injection.to_string()),
                ..Default::default()
            },
            SortColumn::StockIssuer,
            SortDirection::Ascending,
        );
        let (sql, _) = QueryBuilder::new(&q).build_sql(Some(q.window()));
        assert!(!sql.contains("DROP"));
        assert!(!sql.contains("filings"));
    }
}
