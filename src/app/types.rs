use serde::Serialize;

use crate::ledger::{ChartData, Granularity};

/// JSON output for a login or registration
#[derive(Debug, Serialize)]
pub struct LoginOutput {
    pub username: String,
    pub new_user: bool,
    pub transaction_count: usize,
}

/// JSON output for a ledger entry
#[derive(Debug, Serialize)]
pub struct TransactionOutput {
    /// Position in the ledger at the time of listing.
    pub index: usize,
    pub id: String,
    pub description: String,
    pub amount: String,
    pub amount_display: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

/// Income/expense pair, raw and formatted.
#[derive(Debug, Serialize)]
pub struct AmountsOutput {
    pub income: String,
    pub expense: String,
    pub income_display: String,
    pub expense_display: String,
}

#[derive(Debug, Serialize)]
pub struct PeriodOutput {
    pub period: String,
    #[serde(flatten)]
    pub amounts: AmountsOutput,
}

/// JSON output for the totals/charts summary
#[derive(Debug, Serialize)]
pub struct SummaryOutput {
    pub username: String,
    pub granularity: Granularity,
    pub transaction_count: usize,
    #[serde(flatten)]
    pub totals: AmountsOutput,
    pub net_savings: String,
    pub net_savings_display: String,
    pub periods: Vec<PeriodOutput>,
    pub chart: ChartData,
}
