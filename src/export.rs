//! Spreadsheet export of a user's ledger.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;

use crate::models::{Transaction, Username};
use crate::{Error, Result};

/// Produces a downloadable file from a full ledger.
pub trait Exporter {
    /// Returns the path of the written file.
    fn export(&self, username: &Username, transactions: &[Transaction]) -> Result<PathBuf>;
}

/// `{username}_Finance_Report.{extension}`
pub fn report_file_name(username: &Username, extension: &str) -> String {
    format!("{username}_Finance_Report.{extension}")
}

#[derive(Serialize)]
struct CsvRow<'a> {
    desc: &'a str,
    amount: String,
    #[serde(rename = "type")]
    kind: &'static str,
    date: String,
    remarks: &'a str,
}

impl<'a> From<&'a Transaction> for CsvRow<'a> {
    fn from(tx: &'a Transaction) -> Self {
        Self {
            desc: &tx.description,
            amount: tx.amount.normalize().to_string(),
            kind: tx.kind.as_str(),
            date: tx.date.format("%Y-%m-%d").to_string(),
            remarks: tx.remarks.as_deref().unwrap_or(""),
        }
    }
}

/// Write `transactions` as CSV with a `desc,amount,type,date,remarks` header.
pub fn write_csv<W: io::Write>(writer: W, transactions: &[Transaction]) -> anyhow::Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for tx in transactions {
        csv.serialize(CsvRow::from(tx))
            .context("Failed to write CSV row")?;
    }
    csv.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Writes `{username}_Finance_Report.csv` into a directory.
pub struct CsvExporter {
    out_dir: PathBuf,
}

impl CsvExporter {
    pub fn new(out_dir: impl AsRef<Path>) -> Self {
        Self {
            out_dir: out_dir.as_ref().to_path_buf(),
        }
    }
}

impl Exporter for CsvExporter {
    fn export(&self, username: &Username, transactions: &[Transaction]) -> Result<PathBuf> {
        if transactions.is_empty() {
            return Err(Error::NothingToExport);
        }

        let path = self.out_dir.join(report_file_name(username, "csv"));
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        write_csv(file, transactions)?;

        tracing::info!(user = %username, path = %path.display(), rows = transactions.len(), "Exported ledger");
        Ok(path)
    }
}
