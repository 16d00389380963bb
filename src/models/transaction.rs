use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::Id;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid transaction type {0:?}: expected \"income\" or \"expense\"")]
pub struct TransactionTypeError(String);

impl FromStr for TransactionType {
    type Err = TransactionTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(TransactionTypeError(s.to_string())),
        }
    }
}

/// One ledger entry. Serialized field names match the stored blob layout
/// (`desc`, `amount`, `type`, `date`, `remarks`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(default)]
    pub id: Id,
    #[serde(rename = "desc")]
    pub description: String,
    /// Always non-negative; direction comes from `kind`.
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub date: NaiveDate,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub remarks: Option<String>,
}

impl Transaction {
    pub fn new(
        id: Id,
        description: impl Into<String>,
        amount: Decimal,
        kind: TransactionType,
        date: NaiveDate,
    ) -> Self {
        Self {
            id,
            description: description.into(),
            amount,
            kind,
            date,
            remarks: None,
        }
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        let remarks = remarks.into();
        self.remarks = if remarks.trim().is_empty() {
            None
        } else {
            Some(remarks)
        };
        self
    }
}

/// Largest amount a single entry may carry: one quadrillion.
pub fn max_amount() -> Decimal {
    Decimal::new(1_000_000_000_000_000, 0)
}

/// The value `amount` reads back as after a save, or `None` when it is
/// negative, above [`max_amount`], or would change on the way through the
/// JSON number it is stored as.
pub fn storable_amount(amount: Decimal) -> Option<Decimal> {
    if (amount.is_sign_negative() && !amount.is_zero()) || amount > max_amount() {
        return None;
    }
    let stored = amount.to_f64()?;
    let restored = Decimal::from_str(&stored.to_string()).ok()?;
    (restored == amount).then_some(restored)
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Unvalidated input for a new ledger entry, as collected from a form or CLI.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTransaction {
    pub description: String,
    pub amount: String,
    pub kind: String,
    /// `YYYY-MM-DD`; today's date is used when absent or blank.
    pub date: Option<String>,
    pub remarks: Option<String>,
}

impl NewTransaction {
    pub fn new(
        description: impl Into<String>,
        amount: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            amount: amount.into(),
            kind: kind.into(),
            date: None,
            remarks: None,
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn parses_transaction_type_case_insensitively() {
        assert_eq!("Income".parse::<TransactionType>(), Ok(TransactionType::Income));
        assert_eq!(" expense ".parse::<TransactionType>(), Ok(TransactionType::Expense));
        assert!("transfer".parse::<TransactionType>().is_err());
    }

    #[test]
    fn deserializes_reference_blob_without_id() {
        let json = r#"{"desc":"Salary","amount":1000,"type":"income","date":"2024-01-15","remarks":""}"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();

        assert_eq!(tx.description, "Salary");
        assert_eq!(tx.amount, dec("1000"));
        assert_eq!(tx.kind, TransactionType::Income);
        assert_eq!(tx.date, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        assert_eq!(tx.remarks, None);
        assert!(!tx.id.as_str().is_empty());
    }

    #[test]
    fn serializes_with_blob_field_names() {
        let tx = Transaction::new(
            Id::from_string("tx-1"),
            "Rent",
            dec("400.5"),
            TransactionType::Expense,
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
        )
        .with_remarks("January");

        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(value["id"], "tx-1");
        assert_eq!(value["desc"], "Rent");
        assert_eq!(value["amount"], 400.5);
        assert_eq!(value["type"], "expense");
        assert_eq!(value["date"], "2024-01-20");
        assert_eq!(value["remarks"], "January");
    }

    #[test]
    fn storable_amounts() {
        assert_eq!(storable_amount(dec("82.40")), Some(dec("82.4")));
        assert_eq!(storable_amount(dec("0")), Some(Decimal::ZERO));
        assert_eq!(storable_amount(dec("1000000000000000")), Some(max_amount()));

        assert_eq!(storable_amount(dec("-1")), None);
        assert_eq!(storable_amount(dec("1000000000000000.01")), None);
        assert_eq!(storable_amount(dec("0.123456789012345678")), None);
        assert_eq!(storable_amount(Decimal::MAX), None);
    }

    #[test]
    fn blank_remarks_are_dropped() {
        let tx = Transaction::new(
            Id::from_string("tx-1"),
            "Rent",
            dec("400"),
            TransactionType::Expense,
            NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
        )
        .with_remarks("   ");
        assert_eq!(tx.remarks, None);
    }
}
