//! Holdings CLI: query the search API from the terminal.

use anyhow::Context;
use clap::{Parser, Subcommand};
use holdings_client::format::{format_shares, format_value_usd, page_label};
use holdings_client::{ControllerConfig, HoldingsClient, DEFAULT_BASE_URL};
use holdings_models::{
    InvestmentRecord, SearchFilters, SearchRequest, SearchResult, SortColumn, SortDirection,
};

/// Search institutional 13F holdings.
#[derive(Parser)]
#[command(name = "holdings", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Search API base URL
    #[arg(long, global = true, env = "HOLDINGS_API_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Output raw JSON instead of a table
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one search and print a page of results
    Search(SearchArgs),
}

#[derive(clap::Args)]
struct SearchArgs {
    /// Investor CIK (substring)
    #[arg(long)]
    cik: Option<String>,

    #[arg(long)]
    cusip: Option<String>,

    #[arg(long)]
    ticker: Option<String>,

    /// Issuer name (substring)
    #[arg(long)]
    issuer: Option<String>,

    /// Investor name, current or former (substring)
    #[arg(long)]
    investor: Option<String>,

    /// Free-text phrase; the last word matches as a prefix
    #[arg(long)]
    phrase: Option<String>,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Rows per page (default: HOLDINGS_PAGE_SIZE or 25)
    #[arg(long)]
    page_size: Option<u32>,

    /// Sort column, e.g. investor_name or stock_value_x1000
    #[arg(long, default_value = "investor_name")]
    sort: String,

    /// Sort descending
    #[arg(long)]
    desc: bool,
}

impl SearchArgs {
    fn into_request(self) -> anyhow::Result<SearchRequest> {
        let column: SortColumn = self.sort.parse().with_context(|| {
            let names: Vec<&str> = SortColumn::ALL.iter().map(|c| c.as_str()).collect();
            format!("Valid sort columns: {}", names.join(", "))
        })?;
        let direction = if self.desc {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };
        let page_size = self
            .page_size
            .filter(|size| *size > 0)
            .unwrap_or_else(ControllerConfig::page_size_from_env);

        let filters = SearchFilters {
            cik: self.cik,
            cusip: self.cusip,
            ticker: self.ticker,
            issuer: self.issuer,
            investor: self.investor,
            phrase: self.phrase,
        };

        Ok(SearchRequest::new(column, direction)
            .with_filters(filters)
            .with_page(self.page.max(1), page_size))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("holdings_client=warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = HoldingsClient::new(&cli.base_url).context("Failed to build HTTP client")?;

    match cli.command {
        Commands::Search(args) => {
            let request = args.into_request()?;
            let result = client
                .search(&request)
                .await
                .with_context(|| format!("Search against {} failed", client.base_url()))?;

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_table(&request, &result);
            }
        }
    }

    Ok(())
}

const NAME_WIDTH: usize = 32;
const ISSUER_WIDTH: usize = 28;

fn print_table(request: &SearchRequest, result: &SearchResult) {
    if result.rows.is_empty() {
        eprintln!("No holdings matched");
    } else {
        println!(
            "{:<10}  {:<NAME_WIDTH$}  {:<ISSUER_WIDTH$}  {:<6}  {:>20}  {:>20}  {:<10}",
            "CIK", "INVESTOR", "ISSUER", "TICKER", "SHARES", "VALUE", "REPORTED"
        );
        for record in &result.rows {
            println!("{}", table_row(record));
        }
    }

    let page_size = request.page_size.unwrap_or(1);
    println!(
        "\n{} ({} matching)",
        page_label(request.page_number, result.total_pages(page_size)),
        result.total_matching
    );
}

fn table_row(record: &InvestmentRecord) -> String {
    let reported = record
        .form_report_date
        .map(|d| d.to_string())
        .unwrap_or_default();
    format!(
        "{:<10}  {:<NAME_WIDTH$}  {:<ISSUER_WIDTH$}  {:<6}  {:>20}  {:>20}  {:<10}",
        record.investor_cik,
        truncate(&record.investor_name, NAME_WIDTH),
        truncate(&record.stock_issuer, ISSUER_WIDTH),
        record.stock_ticker,
        format_shares(record),
        format_value_usd(record),
        reported
    )
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}
