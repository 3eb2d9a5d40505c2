use chrono::NaiveDate;
use holdings_models::InvestmentRecord;

/// Builder for seeded `current_investments` rows.
pub struct RecordBuilder {
    record: InvestmentRecord,
}

impl RecordBuilder {
    pub fn new(stock_id: u64) -> Self {
        Self {
            record: InvestmentRecord {
                stock_id: stock_id.to_string(),
                investor_cik: format!("{:010}", 1_000_000 + stock_id),
                investor_name: "TEST INVESTOR".to_string(),
                investor_former_names: Vec::new(),
                investor_country: Some("UNITED STATES".to_string()),
                investor_region: Some("NEW YORK".to_string()),
                other_investor_names: Vec::new(),
                form_accession_number: format!("0000950123-24-{stock_id:06}"),
                form_report_date: NaiveDate::from_ymd_opt(2024, 9, 30),
                form_filing_date: NaiveDate::from_ymd_opt(2024, 11, 14),
                stock_issuer: "APPLE INC".to_string(),
                stock_cusip: "037833100".to_string(),
                stock_ticker: "AAPL".to_string(),
                stock_value_x1000: (stock_id * 1_000).to_string(),
                stock_shares_prn_amt: (stock_id * 10_000).to_string(),
                stock_sh_prn: "SH".to_string(),
                stock_voting_auth_sole: Some((stock_id * 10_000).to_string()),
                stock_voting_auth_shared: None,
                stock_voting_auth_none: Some("0".to_string()),
                form_url: format!("https://www.sec.gov/Archives/edgar/data/{stock_id}/"),
            },
        }
    }

    pub fn investor(mut self, name: &str) -> Self {
        self.record.investor_name = name.to_string();
        self
    }

    pub fn former_names(mut self, names: &[&str]) -> Self {
        self.record.investor_former_names = names.iter().map(|n| n.to_string()).collect();
        self
    }

    pub fn security(mut self, issuer: &str, cusip: &str, ticker: &str) -> Self {
        self.record.stock_issuer = issuer.to_string();
        self.record.stock_cusip = cusip.to_string();
        self.record.stock_ticker = ticker.to_string();
        self
    }

    pub fn value_x1000(mut self, value: i64) -> Self {
        self.record.stock_value_x1000 = value.to_string();
        self
    }

    pub fn country(mut self, country: Option<&str>) -> Self {
        self.record.investor_country = country.map(str::to_string);
        self
    }

    pub fn build(self) -> InvestmentRecord {
        self.record
    }
}

const INVESTORS: [&str; 5] = [
    "BERKSHIRE HATHAWAY INC",
    "VANGUARD GROUP INC",
    "BLACKROCK INC",
    "STATE STREET CORP",
    "ACME CAPITAL LLC",
];

const SECURITIES: [(&str, &str, &str); 4] = [
    ("APPLE INC", "037833100", "AAPL"),
    ("MICROSOFT CORP", "594918104", "MSFT"),
    ("NVIDIA CORPORATION", "67066G104", "NVDA"),
    ("ALPHABET INC", "02079K305", "GOOGL"),
];

/// 25 positions: investors cycle every 5 rows, securities every 4.
///
/// Row `i` (1-based) has `stock_id = i`, investor `INVESTORS[(i-1) % 5]`,
/// security `SECURITIES[(i-1) % 4]`, and value `i * 1000`.
pub fn standard_records() -> Vec<InvestmentRecord> {
    (1..=25u64)
        .map(|i| {
            let idx = (i - 1) as usize;
            let (issuer, cusip, ticker) = SECURITIES[idx % SECURITIES.len()];
            let mut builder = RecordBuilder::new(i)
                .investor(INVESTORS[idx % INVESTORS.len()])
                .security(issuer, cusip, ticker);
            if INVESTORS[idx % INVESTORS.len()] == "ACME CAPITAL LLC" {
                builder = builder.former_names(&["ROADRUNNER PARTNERS LP"]).country(None);
            }
            builder.build()
        })
        .collect()
}

/// Three rows whose investor names arrive out of order.
pub fn unsorted_names() -> Vec<InvestmentRecord> {
    vec![
        RecordBuilder::new(1).investor("Zebra Fund").build(),
        RecordBuilder::new(2).investor("Acme Capital").build(),
        RecordBuilder::new(3).investor("Beta Partners").build(),
    ]
}
