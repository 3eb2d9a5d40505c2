//! In-memory investment store.
//!
//! Evaluates a [`SearchQuery`] over a fixed set of records with the same
//! semantics as the SQL the Postgres store runs: substring filters, prefix-AND
//! phrase matching, nulls last, and a `stock_id` tiebreaker. Useful for local
//! runs without a database and for exercising the HTTP surface in tests.

use crate::db::search::phrase::tokenize_document;
use crate::db::search::{PageWindow, SearchQuery, TextFilter, TextFilterField};
use crate::db::traits::InvestmentStore;
use crate::Result;
use async_trait::async_trait;
use holdings_models::{InvestmentRecord, SortColumn};
use std::cmp::Ordering;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Arc;

#[derive(Clone, Default)]
pub struct InMemoryInvestmentStore {
    records: Arc<Vec<InvestmentRecord>>,
    queries: Arc<AtomicUsize>,
}

impl InMemoryInvestmentStore {
    pub fn new(records: Vec<InvestmentRecord>) -> Self {
        Self {
            records: Arc::new(records),
            queries: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of fetch/count calls served so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(AtomicOrdering::SeqCst)
    }

    fn matching(&self, query: &SearchQuery) -> Vec<&InvestmentRecord> {
        self.records
            .iter()
            .filter(|record| {
                query
                    .text_filters
                    .iter()
                    .all(|filter| matches_filter(record, filter))
            })
            .filter(|record| match &query.phrase {
                Some(phrase) => phrase.matches_document(&search_document(record)),
                None => true,
            })
            .collect()
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_filter(record: &InvestmentRecord, filter: &TextFilter) -> bool {
    let value = filter.value.as_str();
    match filter.field {
        TextFilterField::Cik => contains_ignore_case(&record.investor_cik, value),
        TextFilterField::Cusip => contains_ignore_case(&record.stock_cusip, value),
        TextFilterField::Ticker => contains_ignore_case(&record.stock_ticker, value),
        TextFilterField::Issuer => contains_ignore_case(&record.stock_issuer, value),
        TextFilterField::Investor => {
            let mut names = record.investor_name.clone();
            for former in &record.investor_former_names {
                names.push(' ');
                names.push_str(former);
            }
            contains_ignore_case(&names, value)
        }
    }
}

/// Lexemes standing in for the view's `search_document`.
fn search_document(record: &InvestmentRecord) -> Vec<String> {
    let mut text = vec![
        record.investor_cik.as_str(),
        record.investor_name.as_str(),
        record.stock_issuer.as_str(),
        record.stock_cusip.as_str(),
        record.stock_ticker.as_str(),
    ];
    text.extend(record.investor_former_names.iter().map(String::as_str));
    text.extend(record.other_investor_names.iter().map(String::as_str));
    tokenize_document(&text.join(" "))
}

enum SortKey<'a> {
    Text(Option<&'a str>),
    Number(Option<i128>),
    Date(Option<chrono::NaiveDate>),
}

fn number<'a>(value: Option<&str>) -> SortKey<'a> {
    SortKey::Number(value.and_then(|v| v.trim().parse().ok()))
}

fn sort_key(record: &InvestmentRecord, column: SortColumn) -> SortKey<'_> {
    match column {
        SortColumn::StockId => number(Some(record.stock_id.as_str())),
        SortColumn::InvestorCik => SortKey::Text(Some(record.investor_cik.as_str())),
        SortColumn::InvestorName => SortKey::Text(Some(record.investor_name.as_str())),
        SortColumn::InvestorCountry => SortKey::Text(record.investor_country.as_deref()),
        SortColumn::InvestorRegion => SortKey::Text(record.investor_region.as_deref()),
        SortColumn::FormAccessionNumber => {
            SortKey::Text(Some(record.form_accession_number.as_str()))
        }
        SortColumn::FormReportDate => SortKey::Date(record.form_report_date),
        SortColumn::FormFilingDate => SortKey::Date(record.form_filing_date),
        SortColumn::StockIssuer => SortKey::Text(Some(record.stock_issuer.as_str())),
        SortColumn::StockCusip => SortKey::Text(Some(record.stock_cusip.as_str())),
        SortColumn::StockTicker => SortKey::Text(Some(record.stock_ticker.as_str())),
        SortColumn::StockValueX1000 => number(Some(record.stock_value_x1000.as_str())),
        SortColumn::StockSharesPrnAmt => number(Some(record.stock_shares_prn_amt.as_str())),
        SortColumn::StockShPrn => SortKey::Text(Some(record.stock_sh_prn.as_str())),
        SortColumn::StockVotingAuthSole => number(record.stock_voting_auth_sole.as_deref()),
        SortColumn::StockVotingAuthShared => number(record.stock_voting_auth_shared.as_deref()),
        SortColumn::StockVotingAuthNone => number(record.stock_voting_auth_none.as_deref()),
    }
}

/// Direction applies to present values only; missing values always sort last.
fn compare_nulls_last<T: Ord>(a: Option<T>, b: Option<T>, ascending: bool) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => {
            let ord = a.cmp(&b);
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        }
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_keys(a: SortKey<'_>, b: SortKey<'_>, ascending: bool) -> Ordering {
    match (a, b) {
        (SortKey::Text(a), SortKey::Text(b)) => compare_nulls_last(a, b, ascending),
        (SortKey::Number(a), SortKey::Number(b)) => compare_nulls_last(a, b, ascending),
        (SortKey::Date(a), SortKey::Date(b)) => compare_nulls_last(a, b, ascending),
        _ => Ordering::Equal,
    }
}

fn compare_records(a: &InvestmentRecord, b: &InvestmentRecord, query: &SearchQuery) -> Ordering {
    let ascending = query.sort_direction.is_ascending();
    compare_keys(
        sort_key(a, query.sort_column),
        sort_key(b, query.sort_column),
        ascending,
    )
    .then_with(|| {
        compare_keys(
            sort_key(a, SortColumn::StockId),
            sort_key(b, SortColumn::StockId),
            ascending,
        )
    })
    .then_with(|| {
        let ord = a.stock_id.cmp(&b.stock_id);
        if ascending {
            ord
        } else {
            ord.reverse()
        }
    })
}

#[async_trait]
impl InvestmentStore for InMemoryInvestmentStore {
    async fn fetch(
        &self,
        query: &SearchQuery,
        window: Option<PageWindow>,
    ) -> Result<Vec<InvestmentRecord>> {
        self.queries.fetch_add(1, AtomicOrdering::SeqCst);

        let mut rows: Vec<InvestmentRecord> =
            self.matching(query).into_iter().cloned().collect();
        rows.sort_by(|a, b| compare_records(a, b, query));

        Ok(match window {
            Some(window) => window.slice(rows),
            None => rows,
        })
    }

    async fn count(&self, query: &SearchQuery) -> Result<u64> {
        self.queries.fetch_add(1, AtomicOrdering::SeqCst);
        Ok(self.matching(query).len() as u64)
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}
