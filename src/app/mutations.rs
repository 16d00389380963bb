use std::path::Path;

use anyhow::Result;

use crate::config::ResolvedConfig;
use crate::export::{CsvExporter, Exporter};
use crate::models::{Id, NewTransaction};
use crate::session::Session;

use super::list::transaction_output;
use super::TransactionOutput;

/// Which entry to delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteTarget {
    /// Position in the current listing.
    Index(usize),
    Id(Id),
}

pub async fn add_transaction(
    session: &mut Session,
    config: &ResolvedConfig,
    input: NewTransaction,
) -> Result<TransactionOutput> {
    let tx = session.ledger_mut().add(input).await?;
    let index = session.ledger().len() - 1;
    Ok(transaction_output(index, &tx, &config.display))
}

pub async fn delete_transaction(
    session: &mut Session,
    target: DeleteTarget,
) -> Result<serde_json::Value> {
    let ledger = session.ledger_mut();
    let removed = match &target {
        DeleteTarget::Index(index) => ledger.delete(*index).await?,
        DeleteTarget::Id(id) => ledger.delete_by_id(id).await?,
    };

    Ok(serde_json::json!({
        "success": true,
        "deleted": {
            "id": removed.id.to_string(),
            "description": removed.description,
        },
        "remaining": ledger.len()
    }))
}

pub fn export_transactions(session: &Session, out_dir: &Path) -> Result<serde_json::Value> {
    let ledger = session.ledger();
    let path = CsvExporter::new(out_dir).export(ledger.username(), ledger.transactions())?;

    Ok(serde_json::json!({
        "success": true,
        "file": path.display().to_string(),
        "rows": ledger.len()
    }))
}
