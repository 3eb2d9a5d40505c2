//! Result rows and the paged result envelope.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of `current_investments`: a position reported in a 13F filing,
/// flattened with its investor, filing, and security.
///
/// Integer columns travel as text so no client loses precision on them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentRecord {
    /// Opaque, stable row identifier. Not assumed to be monotonic.
    pub stock_id: String,
    pub investor_cik: String,
    pub investor_name: String,
    #[serde(default)]
    pub investor_former_names: Vec<String>,
    pub investor_country: Option<String>,
    pub investor_region: Option<String>,
    /// Co-filing managers listed on the same position
    #[serde(default)]
    pub other_investor_names: Vec<String>,
    pub form_accession_number: String,
    pub form_report_date: Option<NaiveDate>,
    pub form_filing_date: Option<NaiveDate>,
    pub stock_issuer: String,
    pub stock_cusip: String,
    #[serde(default)]
    pub stock_ticker: String,
    /// Market value in thousands of dollars
    pub stock_value_x1000: String,
    pub stock_shares_prn_amt: String,
    /// `SH` (shares) or `PRN` (principal amount)
    pub stock_sh_prn: String,
    pub stock_voting_auth_sole: Option<String>,
    pub stock_voting_auth_shared: Option<String>,
    pub stock_voting_auth_none: Option<String>,
    pub form_url: String,
}

impl InvestmentRecord {
    /// Share/principal amount as a number, for display formatting.
    pub fn shares_amount(&self) -> Option<i64> {
        self.stock_shares_prn_amt.trim().parse().ok()
    }
}

/// One page of search results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub rows: Vec<InvestmentRecord>,
    /// Rows matching the request across all pages
    pub total_matching: u64,
}

impl SearchResult {
    /// `ceil(total_matching / page_size)`; zero for an empty result or page size.
    pub fn total_pages(&self, page_size: u32) -> u64 {
        if page_size == 0 {
            return 0;
        }
        self.total_matching.div_ceil(u64::from(page_size))
    }
}

/// Error payload returned with every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
