use rust_decimal::Decimal;
use serde::Serialize;

use super::AggregateView;

/// Series handed to a chart renderer: an income/expense proportion and a
/// grouped bar per period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartData {
    pub pie: PieSeries,
    pub bar: BarSeries,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PieSeries {
    pub labels: [&'static str; 2],
    pub values: [Decimal; 2],
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BarSeries {
    pub labels: Vec<String>,
    pub income: Vec<Decimal>,
    pub expense: Vec<Decimal>,
}

impl From<&AggregateView> for ChartData {
    fn from(view: &AggregateView) -> Self {
        let pie = PieSeries {
            labels: ["Income", "Expense"],
            values: [view.total_income, view.total_expense],
        };
        let bar = BarSeries {
            labels: view.periods.iter().map(|p| p.period.clone()).collect(),
            income: view.periods.iter().map(|p| p.income).collect(),
            expense: view.periods.iter().map(|p| p.expense).collect(),
        };
        Self { pie, bar }
    }
}
