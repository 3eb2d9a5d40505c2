//! Display helpers for result rows

use holdings_models::InvestmentRecord;

/// `1234567` → `"1,234,567"`.
pub fn format_thousands(value: i128) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Share or principal amount with its unit, e.g. `"300,000,000 SH"`.
/// Non-numeric amounts are shown as received.
pub fn format_shares(record: &InvestmentRecord) -> String {
    let amount = match record.shares_amount() {
        Some(amount) => format_thousands(i128::from(amount)),
        None => record.stock_shares_prn_amt.clone(),
    };
    format!("{} {}", amount, record.stock_sh_prn)
}

/// Market value in dollars; the column is reported in thousands.
pub fn format_value_usd(record: &InvestmentRecord) -> String {
    record
        .stock_value_x1000
        .trim()
        .parse::<i128>()
        .ok()
        .and_then(|thousands| thousands.checked_mul(1000))
        .map(|dollars| format!("${}", format_thousands(dollars)))
        .unwrap_or_else(|| record.stock_value_x1000.clone())
}

pub fn page_label(current_page: u32, total_pages: u64) -> String {
    format!("page {} of {}", current_page, total_pages.max(1))
}
