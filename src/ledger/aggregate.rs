use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Transaction, TransactionType};

/// How transaction dates are bucketed into periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// `YYYY-MM`
    #[default]
    Month,
    /// `YYYY-MM-DD`
    Day,
}

impl Granularity {
    pub fn period_key(&self, date: NaiveDate) -> String {
        match self {
            Granularity::Month => date.format("%Y-%m").to_string(),
            Granularity::Day => date.format("%Y-%m-%d").to_string(),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Granularity::Month => f.write_str("month"),
            Granularity::Day => f.write_str("day"),
        }
    }
}

impl FromStr for Granularity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "month" | "monthly" => Ok(Granularity::Month),
            "day" | "daily" => Ok(Granularity::Day),
            _ => anyhow::bail!("Invalid period: {s}. Use: month, day"),
        }
    }
}

/// Income and expense sums for one period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodTotals {
    pub period: String,
    pub income: Decimal,
    pub expense: Decimal,
}

impl PeriodTotals {
    fn new(period: String) -> Self {
        Self {
            period,
            income: Decimal::ZERO,
            expense: Decimal::ZERO,
        }
    }

    fn add(&mut self, kind: TransactionType, amount: Decimal) {
        match kind {
            TransactionType::Income => self.income += amount,
            TransactionType::Expense => self.expense += amount,
        }
    }
}

/// Totals derived from a ledger snapshot. Never stored; recompute after
/// every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateView {
    pub granularity: Granularity,
    pub total_income: Decimal,
    pub total_expense: Decimal,
    /// `total_income - total_expense`; negative when spending exceeds income.
    pub net_savings: Decimal,
    /// In order of each period's first appearance in the ledger.
    pub periods: Vec<PeriodTotals>,
}

impl AggregateView {
    pub fn period(&self, key: &str) -> Option<&PeriodTotals> {
        self.periods.iter().find(|p| p.period == key)
    }
}

/// Single pass over `transactions`: classify by type, accumulate totals, and
/// accumulate into the bucket for each record's date.
pub fn aggregate(transactions: &[Transaction], granularity: Granularity) -> AggregateView {
    let mut total_income = Decimal::ZERO;
    let mut total_expense = Decimal::ZERO;
    let mut by_period: HashMap<String, usize> = HashMap::new();
    let mut periods: Vec<PeriodTotals> = Vec::new();

    for tx in transactions {
        match tx.kind {
            TransactionType::Income => total_income += tx.amount,
            TransactionType::Expense => total_expense += tx.amount,
        }

        let key = granularity.period_key(tx.date);
        let idx = match by_period.get(&key).copied() {
            Some(idx) => idx,
            None => {
                by_period.insert(key.clone(), periods.len());
                periods.push(PeriodTotals::new(key));
                periods.len() - 1
            }
        };
        periods[idx].add(tx.kind, tx.amount);
    }

    AggregateView {
        granularity,
        total_income,
        total_expense,
        net_savings: total_income - total_expense,
        periods,
    }
}
