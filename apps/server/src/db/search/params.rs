//! Validated search parameters.
//!
//! [`SearchQuery`] is built from the wire-level [`SearchRequest`] before any SQL
//! exists. Once constructed, the sort column is a closed enum, the page size is
//! within configured bounds, and blank filters have been dropped.

use crate::config::SearchConfig;
use crate::{Error, Result};
use holdings_models::{SearchRequest, SortColumn, SortDirection};
use validator::Validate;

use super::phrase::{normalize_whitespace, PhraseQuery};

/// Columns a text filter may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFilterField {
    Cik,
    Cusip,
    Ticker,
    Issuer,
    /// Current name plus former names
    Investor,
}

impl TextFilterField {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextFilterField::Cik => "cik",
            TextFilterField::Cusip => "cusip",
            TextFilterField::Ticker => "ticker",
            TextFilterField::Issuer => "issuer",
            TextFilterField::Investor => "investor",
        }
    }
}

/// Case-insensitive substring filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextFilter {
    pub field: TextFilterField,
    /// Trimmed, whitespace-collapsed, never empty
    pub value: String,
}

/// Row window of one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub limit: u64,
    pub offset: u64,
}

impl PageWindow {
    /// Apply the window to an already sorted, unpaged result.
    pub fn slice<T>(&self, rows: Vec<T>) -> Vec<T> {
        let offset = usize::try_from(self.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(self.limit).unwrap_or(usize::MAX);
        rows.into_iter().skip(offset).take(limit).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text_filters: Vec<TextFilter>,
    pub phrase: Option<PhraseQuery>,
    pub sort_column: SortColumn,
    pub sort_direction: SortDirection,
    pub page_size: u32,
    pub page_number: u32,
}

impl SearchQuery {
    /// Validate a request. Fails with [`Error::Validation`] on a bad sort
    /// column, sort direction, or page field.
    pub fn from_request(request: &SearchRequest, config: &SearchConfig) -> Result<Self> {
        request.validate()?;

        let sort_column: SortColumn = request.sort_column.parse()?;
        let sort_direction: SortDirection = request.sort_direction.parse()?;

        let page_size = request.page_size.unwrap_or(config.default_page_size);
        if page_size == 0 {
            return Err(Error::Validation("pageSize must be at least 1".to_string()));
        }
        // Results carry no page size, so a silently reduced one would desync client paging.
        if page_size > config.max_page_size {
            return Err(Error::Validation(format!(
                "pageSize must be at most {} (got {})",
                config.max_page_size, page_size
            )));
        }

        let filters = &request.filters;
        let text_filters = [
            (TextFilterField::Cik, &filters.cik),
            (TextFilterField::Cusip, &filters.cusip),
            (TextFilterField::Ticker, &filters.ticker),
            (TextFilterField::Issuer, &filters.issuer),
            (TextFilterField::Investor, &filters.investor),
        ]
        .into_iter()
        .filter_map(|(field, value)| {
            let value = normalize_whitespace(value.as_deref()?);
            (!value.is_empty()).then_some(TextFilter { field, value })
        })
        .collect();

        let phrase = filters.phrase.as_deref().and_then(PhraseQuery::parse);

        Ok(Self {
            text_filters,
            phrase,
            sort_column,
            sort_direction,
            page_size,
            page_number: request.page_number,
        })
    }

    /// True when at least one filter survived normalization.
    pub fn has_filters(&self) -> bool {
        !self.text_filters.is_empty() || self.phrase.is_some()
    }

    pub fn window(&self) -> PageWindow {
        PageWindow {
            limit: u64::from(self.page_size),
            offset: u64::from(self.page_size) * u64::from(self.page_number.saturating_sub(1)),
        }
    }
}
