//! Search controller
//!
//! Owns the view state of a holdings search screen: page, page size, sort,
//! search text and filters, plus what is currently displayed. Changes to
//! page, sort, or page size issue a search immediately; text and filter edits
//! reset to page 1 and are debounced.
//!
//! Every issued search gets a sequence number. Only the response carrying the
//! latest number may update the display, so a slow response for an old page
//! never overwrites a newer one.
//!
//! Methods that issue searches spawn tasks and must be called from within a
//! tokio runtime.

use crate::client::HoldingsClient;
use crate::error::{Error, Result};
use async_trait::async_trait;
use holdings_models::{
    InvestmentRecord, SearchFilters, SearchRequest, SearchResult, SortColumn, SortDirection,
};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const PAGE_SIZE_ENV_VAR: &str = "HOLDINGS_PAGE_SIZE";
pub const DEFAULT_PAGE_SIZE: u32 = 25;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

/// Anything that can answer a search request.
#[async_trait]
pub trait SearchBackend: Send + Sync + 'static {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResult>;
}

#[async_trait]
impl SearchBackend for HoldingsClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResult> {
        HoldingsClient::search(self, request).await
    }
}

#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub page_size: u32,
    pub debounce: Duration,
    pub sort_column: SortColumn,
    pub sort_direction: SortDirection,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            debounce: DEFAULT_DEBOUNCE,
            sort_column: SortColumn::InvestorName,
            sort_direction: SortDirection::Ascending,
        }
    }
}

impl ControllerConfig {
    /// Defaults, with the page size taken from `HOLDINGS_PAGE_SIZE` when set.
    pub fn from_env() -> Self {
        Self {
            page_size: Self::page_size_from_env(),
            ..Self::default()
        }
    }

    pub fn page_size_from_env() -> u32 {
        parse_page_size(std::env::var(PAGE_SIZE_ENV_VAR).ok().as_deref())
    }
}

/// Absent, unparseable, or zero values fall back to [`DEFAULT_PAGE_SIZE`].
fn parse_page_size(raw: Option<&str>) -> u32 {
    match raw.map(str::trim).map(str::parse::<u32>) {
        Some(Ok(size)) if size > 0 => size,
        Some(_) => {
            tracing::warn!(
                value = raw.unwrap_or_default(),
                default = DEFAULT_PAGE_SIZE,
                "Invalid {PAGE_SIZE_ENV_VAR}, using default page size"
            );
            DEFAULT_PAGE_SIZE
        }
        None => DEFAULT_PAGE_SIZE,
    }
}

/// Structured filters settable through [`SearchController::set_filter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Cik,
    Cusip,
    Ticker,
    Issuer,
    Investor,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayState {
    Idle,
    /// A search is in flight, or a debounced edit is waiting to issue one
    Loading,
    Ready {
        rows: Vec<InvestmentRecord>,
        total_matching: u64,
    },
    Failed {
        error: String,
    },
}

/// Snapshot of everything a view renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub current_page: u32,
    pub page_size: u32,
    pub sort_column: SortColumn,
    pub sort_direction: SortDirection,
    pub search_text: String,
    pub filters: SearchFilters,
    /// Last known total; kept while a newer search is loading, zero after a failure
    pub total_matching: u64,
    pub display: DisplayState,
}

impl ViewState {
    fn new(config: &ControllerConfig) -> Self {
        Self {
            current_page: 1,
            page_size: config.page_size.max(1),
            sort_column: config.sort_column,
            sort_direction: config.sort_direction,
            search_text: String::new(),
            filters: SearchFilters::default(),
            total_matching: 0,
            display: DisplayState::Idle,
        }
    }

    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_matching.div_ceil(u64::from(self.page_size))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.display, DisplayState::Loading)
    }

    /// Request for the current state.
    pub fn request(&self) -> SearchRequest {
        let mut filters = self.filters.clone();
        let text = self.search_text.trim();
        filters.phrase = (!text.is_empty()).then(|| text.to_string());

        SearchRequest::new(self.sort_column, self.sort_direction)
            .with_filters(filters)
            .with_page(self.current_page, self.page_size)
    }
}

struct Inner {
    view: ViewState,
    latest_sequence: u64,
    debounce_generation: u64,
    pending_debounce: Option<JoinHandle<()>>,
}

struct Shared<B> {
    backend: B,
    debounce: Duration,
    inner: Mutex<Inner>,
    updates: watch::Sender<ViewState>,
}

pub struct SearchController<B: SearchBackend> {
    shared: Arc<Shared<B>>,
}

impl<B: SearchBackend> Clone for SearchController<B> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<B: SearchBackend> SearchController<B> {
    pub fn new(backend: B, config: ControllerConfig) -> Self {
        let view = ViewState::new(&config);
        let (updates, _) = watch::channel(view.clone());
        Self {
            shared: Arc::new(Shared {
                backend,
                debounce: config.debounce,
                inner: Mutex::new(Inner {
                    view,
                    latest_sequence: 0,
                    debounce_generation: 0,
                    pending_debounce: None,
                }),
                updates,
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.shared.updates.subscribe()
    }

    pub fn snapshot(&self) -> ViewState {
        self.shared.lock().view.clone()
    }

    /// Initial load.
    pub fn mount(&self) -> JoinHandle<()> {
        self.search_now(|_| {})
    }

    pub fn refresh(&self) -> JoinHandle<()> {
        self.search_now(|_| {})
    }

    /// Pages below 1 are treated as page 1.
    pub fn set_page(&self, page: u32) -> JoinHandle<()> {
        self.search_now(|view| view.current_page = page.max(1))
    }

    pub fn set_page_size(&self, page_size: u32) -> JoinHandle<()> {
        self.search_now(|view| {
            view.page_size = page_size.max(1);
            view.current_page = 1;
        })
    }

    /// Same column flips the direction; a new column starts ascending.
    pub fn toggle_sort(&self, column: SortColumn) -> JoinHandle<()> {
        self.search_now(|view| {
            if view.sort_column == column {
                view.sort_direction = view.sort_direction.toggled();
            } else {
                view.sort_column = column;
                view.sort_direction = SortDirection::Ascending;
            }
        })
    }

    pub fn set_search_text(&self, text: impl Into<String>) {
        let text = text.into();
        self.search_debounced(|view| view.search_text = text);
    }

    /// Blank values clear the filter.
    pub fn set_filter(&self, field: FilterField, value: Option<String>) {
        let value = value.filter(|v| !v.trim().is_empty());
        self.search_debounced(|view| {
            let slot = match field {
                FilterField::Cik => &mut view.filters.cik,
                FilterField::Cusip => &mut view.filters.cusip,
                FilterField::Ticker => &mut view.filters.ticker,
                FilterField::Issuer => &mut view.filters.issuer,
                FilterField::Investor => &mut view.filters.investor,
            };
            *slot = value;
        })
    }

    fn search_now(&self, update: impl FnOnce(&mut ViewState)) -> JoinHandle<()> {
        let mut inner = self.shared.lock();
        // An immediate search already covers any pending edit.
        inner.cancel_debounce();
        update(&mut inner.view);
        Shared::start_search(&self.shared, &mut inner)
    }

    fn search_debounced(&self, update: impl FnOnce(&mut ViewState)) {
        let mut inner = self.shared.lock();
        inner.cancel_debounce();
        update(&mut inner.view);
        inner.view.current_page = 1;
        // Rows on screen belong to the old filters and page.
        inner.view.display = DisplayState::Loading;
        self.shared.updates.send_replace(inner.view.clone());

        let generation = inner.debounce_generation;
        let shared = Arc::clone(&self.shared);
        inner.pending_debounce = Some(tokio::spawn(async move {
            tokio::time::sleep(shared.debounce).await;
            let mut inner = shared.lock();
            if inner.debounce_generation != generation {
                return;
            }
            inner.pending_debounce = None;
            // Runs detached; the display update happens inside the task.
            drop(Shared::start_search(&shared, &mut inner));
        }));
    }
}

impl Inner {
    fn cancel_debounce(&mut self) {
        self.debounce_generation += 1;
        if let Some(handle) = self.pending_debounce.take() {
            handle.abort();
        }
    }
}

impl<B: SearchBackend> Shared<B> {
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Marks the view loading and spawns the request. Caller holds the lock.
    fn start_search(this: &Arc<Self>, inner: &mut Inner) -> JoinHandle<()> {
        inner.latest_sequence += 1;
        let sequence = inner.latest_sequence;
        inner.view.display = DisplayState::Loading;
        let request = inner.view.request();
        this.updates.send_replace(inner.view.clone());

        let shared = Arc::clone(this);
        tokio::spawn(async move {
            let outcome = shared.backend.search(&request).await;
            shared.finish_search(sequence, outcome);
        })
    }

    fn finish_search(&self, sequence: u64, outcome: Result<SearchResult>) {
        let mut inner = self.lock();
        if sequence != inner.latest_sequence {
            tracing::debug!(
                sequence,
                latest = inner.latest_sequence,
                "Discarding stale search response"
            );
            return;
        }

        inner.view.display = match outcome {
            Ok(result) => {
                inner.view.total_matching = result.total_matching;
                DisplayState::Ready {
                    rows: result.rows,
                    total_matching: result.total_matching,
                }
            }
            Err(error) => {
                tracing::warn!(sequence, error = %error, "Search failed");
                inner.view.total_matching = 0;
                DisplayState::Failed {
                    error: display_error(&error),
                }
            }
        };
        self.updates.send_replace(inner.view.clone());
    }
}

fn display_error(error: &Error) -> String {
    match error {
        Error::Api { message, .. } => message.clone(),
        other => other.to_string(),
    }
}
