//! A single user's ordered list of income and expense entries.
//!
//! The whole list is stored as one JSON array under `financeData_{username}`
//! and rewritten after every change. Entries keep insertion order.

mod aggregate;
mod chart;

pub use aggregate::{aggregate, AggregateView, Granularity, PeriodTotals};
pub use chart::{BarSeries, ChartData, PieSeries};

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::clock::{Clock, SystemClock};
use crate::models::{
    max_amount, storable_amount, Id, IdGenerator, NewTransaction, Transaction, TransactionType,
    Username, UuidIdGenerator,
};
use crate::storage::{ledger_key, Storage};
use crate::{Error, Result};

pub struct Ledger {
    username: Username,
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    transactions: Vec<Transaction>,
}

impl Ledger {
    /// Load the ledger stored for `username`, or an empty one.
    pub async fn load(storage: Arc<dyn Storage>, username: Username) -> Result<Self> {
        Self::load_with(
            storage,
            username,
            Arc::new(SystemClock),
            Arc::new(UuidIdGenerator),
        )
        .await
    }

    pub async fn load_with(
        storage: Arc<dyn Storage>,
        username: Username,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Result<Self> {
        let key = ledger_key(&username);
        let transactions = match storage.get(&key).await? {
            Some(raw) => {
                let entries: Vec<serde_json::Value> =
                    serde_json::from_str(&raw).map_err(|source| Error::Corrupt {
                        key: key.clone(),
                        source,
                    })?;
                readable_entries(&username, entries)
            }
            None => Vec::new(),
        };
        tracing::debug!(user = %username, count = transactions.len(), "Loaded ledger");

        Ok(Self {
            username,
            storage,
            clock,
            ids,
            transactions,
        })
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn position(&self, id: &Id) -> Option<usize> {
        self.transactions.iter().position(|tx| &tx.id == id)
    }

    /// Validate `input`, append it, and persist. Returns the stored entry.
    pub async fn add(&mut self, input: NewTransaction) -> Result<Transaction> {
        let tx = self.prepare(input)?;

        let mut next = self.transactions.clone();
        next.push(tx.clone());
        self.commit(next).await?;

        tracing::info!(
            user = %self.username,
            id = %tx.id,
            kind = %tx.kind,
            amount = %tx.amount,
            "Added transaction"
        );
        Ok(tx)
    }

    /// Remove the entry at `index` in the current order, and persist.
    ///
    /// Positions shift after every delete; prefer [`Ledger::delete_by_id`]
    /// when the caller holds an id.
    pub async fn delete(&mut self, index: usize) -> Result<Transaction> {
        let len = self.transactions.len();
        if index >= len {
            return Err(Error::IndexOutOfRange { index, len });
        }
        self.remove_at(index).await
    }

    pub async fn delete_by_id(&mut self, id: &Id) -> Result<Transaction> {
        let index = self
            .position(id)
            .ok_or_else(|| Error::TransactionNotFound(id.clone()))?;
        self.remove_at(index).await
    }

    /// Overwrite the stored ledger with the in-memory list.
    pub async fn persist(&self) -> Result<()> {
        self.write(&self.transactions).await
    }

    pub fn aggregate(&self, granularity: Granularity) -> AggregateView {
        aggregate(&self.transactions, granularity)
    }

    async fn remove_at(&mut self, index: usize) -> Result<Transaction> {
        let mut next = self.transactions.clone();
        let removed = next.remove(index);
        self.commit(next).await?;

        tracing::info!(user = %self.username, id = %removed.id, index, "Deleted transaction");
        Ok(removed)
    }

    /// Write `next`, then adopt it. A failed write leaves the ledger as it was.
    async fn commit(&mut self, next: Vec<Transaction>) -> Result<()> {
        self.write(&next).await?;
        self.transactions = next;
        Ok(())
    }

    async fn write(&self, transactions: &[Transaction]) -> Result<()> {
        let key = ledger_key(&self.username);
        let raw = serde_json::to_string(transactions).map_err(|e| Error::Storage(e.into()))?;
        self.storage.set(&key, &raw).await?;
        Ok(())
    }

    fn prepare(&self, input: NewTransaction) -> Result<Transaction> {
        let description = input.description.trim();
        if description.is_empty() {
            return Err(Error::invalid("description is required"));
        }

        let amount = parse_amount(&input.amount)?;

        let kind = input
            .kind
            .parse::<TransactionType>()
            .map_err(|e| Error::invalid(e.to_string()))?;

        let date = match input.date.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map_err(|_| Error::invalid(format!("invalid date {raw:?}: expected YYYY-MM-DD")))?,
            _ => self.clock.today(),
        };

        let tx = Transaction::new(self.ids.new_id(), description, amount, kind, date);
        Ok(match input.remarks {
            Some(remarks) => tx.with_remarks(remarks.trim()),
            None => tx,
        })
    }
}

fn parse_amount(raw: &str) -> Result<Decimal> {
    let raw = raw.trim();
    let amount: Decimal = raw
        .parse()
        .map_err(|_| Error::invalid(format!("invalid amount {raw:?}")))?;
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(Error::invalid(format!("amount must not be negative: {raw}")));
    }
    if amount > max_amount() {
        return Err(Error::invalid(format!(
            "amount {raw} exceeds the maximum of {}",
            max_amount()
        )));
    }
    storable_amount(amount)
        .ok_or_else(|| Error::invalid(format!("amount {raw} has too many significant digits")))
}

/// Entries that fail to parse or carry an out-of-range amount are skipped so
/// one bad record does not lock the user out of the rest.
fn readable_entries(username: &Username, entries: Vec<serde_json::Value>) -> Vec<Transaction> {
    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Transaction>(entry) {
            Ok(tx) if storable_amount(tx.amount).is_some() => Some(tx),
            Ok(tx) => {
                tracing::warn!(
                    user = %username,
                    index,
                    amount = %tx.amount,
                    "Skipping entry with unusable amount"
                );
                None
            }
            Err(e) => {
                tracing::warn!(user = %username, index, error = %e, "Skipping unreadable entry");
                None
            }
        })
        .collect()
}
