//! Search request DTO and sort allow-list.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

/// Optional text filters. Blank values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchFilters {
    /// Company identifier (investor CIK)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 64))]
    pub cik: Option<String>,

    /// Security identifier (CUSIP)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 64))]
    pub cusip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 64))]
    pub ticker: Option<String>,

    /// Issuer (held company) name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 256))]
    pub issuer: Option<String>,

    /// Investor name, matched against current and former names
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 256))]
    pub investor: Option<String>,

    /// Free-text document phrase
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 512))]
    pub phrase: Option<String>,
}

/// Request body for `POST /api/search`.
///
/// Sort fields stay as raw strings on the wire; the server parses them into
/// [`SortColumn`] / [`SortDirection`] before any SQL is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(flatten)]
    #[validate(nested)]
    pub filters: SearchFilters,

    /// Rows per page. The server default applies when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1))]
    pub page_size: Option<u32>,

    /// 1-based page number
    #[serde(default = "default_page_number")]
    #[validate(range(min = 1))]
    pub page_number: u32,

    pub sort_column: String,

    pub sort_direction: String,
}

fn default_page_number() -> u32 {
    1
}

impl SearchRequest {
    pub fn new(sort_column: SortColumn, sort_direction: SortDirection) -> Self {
        Self {
            filters: SearchFilters::default(),
            page_size: None,
            page_number: 1,
            sort_column: sort_column.to_string(),
            sort_direction: sort_direction.to_string(),
        }
    }

    pub fn with_filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_page(mut self, page_number: u32, page_size: u32) -> Self {
        self.page_number = page_number;
        self.page_size = Some(page_size);
        self
    }
}

/// Columns of `current_investments` that results may be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortColumn {
    StockId,
    InvestorCik,
    InvestorName,
    InvestorCountry,
    InvestorRegion,
    FormAccessionNumber,
    FormReportDate,
    FormFilingDate,
    StockIssuer,
    StockCusip,
    StockTicker,
    #[serde(rename = "stock_value_x1000")]
    StockValueX1000,
    StockSharesPrnAmt,
    StockShPrn,
    StockVotingAuthSole,
    StockVotingAuthShared,
    StockVotingAuthNone,
}

impl SortColumn {
    pub const ALL: [SortColumn; 17] = [
        SortColumn::StockId,
        SortColumn::InvestorCik,
        SortColumn::InvestorName,
        SortColumn::InvestorCountry,
        SortColumn::InvestorRegion,
        SortColumn::FormAccessionNumber,
        SortColumn::FormReportDate,
        SortColumn::FormFilingDate,
        SortColumn::StockIssuer,
        SortColumn::StockCusip,
        SortColumn::StockTicker,
        SortColumn::StockValueX1000,
        SortColumn::StockSharesPrnAmt,
        SortColumn::StockShPrn,
        SortColumn::StockVotingAuthSole,
        SortColumn::StockVotingAuthShared,
        SortColumn::StockVotingAuthNone,
    ];

    /// View column name. This is the only text ever interpolated into ORDER BY.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortColumn::StockId => "stock_id",
            SortColumn::InvestorCik => "investor_cik",
            SortColumn::InvestorName => "investor_name",
            SortColumn::InvestorCountry => "investor_country",
            SortColumn::InvestorRegion => "investor_region",
            SortColumn::FormAccessionNumber => "form_accession_number",
            SortColumn::FormReportDate => "form_report_date",
            SortColumn::FormFilingDate => "form_filing_date",
            SortColumn::StockIssuer => "stock_issuer",
            SortColumn::StockCusip => "stock_cusip",
            SortColumn::StockTicker => "stock_ticker",
            SortColumn::StockValueX1000 => "stock_value_x1000",
            SortColumn::StockSharesPrnAmt => "stock_shares_prn_amt",
            SortColumn::StockShPrn => "stock_sh_prn",
            SortColumn::StockVotingAuthSole => "stock_voting_auth_sole",
            SortColumn::StockVotingAuthShared => "stock_voting_auth_shared",
            SortColumn::StockVotingAuthNone => "stock_voting_auth_none",
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortColumn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SortColumn::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::InvalidSortColumn(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    #[serde(alias = "asc")]
    Ascending,
    #[serde(alias = "desc")]
    Descending,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "ASC",
            SortDirection::Descending => "DESC",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    pub fn is_ascending(&self) -> bool {
        matches!(self, SortDirection::Ascending)
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Ascending => f.write_str("ascending"),
            SortDirection::Descending => f.write_str("descending"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ascending" | "asc" => Ok(SortDirection::Ascending),
            "descending" | "desc" => Ok(SortDirection::Descending),
            _ => Err(Error::InvalidSortDirection(s.to_string())),
        }
    }
}
