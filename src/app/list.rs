use rust_decimal::Decimal;

use crate::config::{DisplayConfig, ResolvedConfig};
use crate::format::format_currency;
use crate::models::Transaction;
use crate::session::Session;

use super::{AmountsOutput, PeriodOutput, SummaryOutput, TransactionOutput};

pub(crate) fn transaction_output(
    index: usize,
    tx: &Transaction,
    display: &DisplayConfig,
) -> TransactionOutput {
    TransactionOutput {
        index,
        id: tx.id.to_string(),
        description: tx.description.clone(),
        amount: tx.amount.normalize().to_string(),
        amount_display: format_currency(tx.amount, display),
        kind: tx.kind.to_string(),
        date: tx.date.format("%Y-%m-%d").to_string(),
        remarks: tx.remarks.clone(),
    }
}

fn amounts(income: Decimal, expense: Decimal, display: &DisplayConfig) -> AmountsOutput {
    AmountsOutput {
        income: income.normalize().to_string(),
        expense: expense.normalize().to_string(),
        income_display: format_currency(income, display),
        expense_display: format_currency(expense, display),
    }
}

/// Every entry in ledger order, one row per transaction.
pub fn list_transactions(session: &Session, config: &ResolvedConfig) -> Vec<TransactionOutput> {
    session
        .ledger()
        .transactions()
        .iter()
        .enumerate()
        .map(|(index, tx)| transaction_output(index, tx, &config.display))
        .collect()
}

/// Totals, per-period breakdown, and chart series, computed fresh from the ledger.
pub fn summary(session: &Session, config: &ResolvedConfig) -> SummaryOutput {
    let view = session.summary(config.report.period);
    let display = &config.display;

    SummaryOutput {
        username: session.username().to_string(),
        granularity: view.granularity,
        transaction_count: session.ledger().len(),
        totals: amounts(view.total_income, view.total_expense, display),
        net_savings: view.net_savings.normalize().to_string(),
        net_savings_display: format_currency(view.net_savings, display),
        periods: view
            .periods
            .iter()
            .map(|p| PeriodOutput {
                period: p.period.clone(),
                amounts: amounts(p.income, p.expense, display),
            })
            .collect(),
        chart: (&view).into(),
    }
}
