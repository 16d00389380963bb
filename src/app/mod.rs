//! Operations behind the command-line front end. Each returns a serializable
//! value that the binary prints as JSON.

mod auth;
mod config;
mod list;
mod mutations;
mod types;

use std::sync::Arc;

use crate::config::ResolvedConfig;
use crate::session::Tracker;
use crate::storage::JsonFileStorage;

pub use auth::{login, reset_password, security_question};
pub use config::config_output;
pub use list::{list_transactions, summary};
pub use mutations::{add_transaction, delete_transaction, export_transactions, DeleteTarget};
pub use types::{
    AmountsOutput, LoginOutput, PeriodOutput, SummaryOutput, TransactionOutput,
};

/// A tracker backed by JSON files in the configured data directory.
pub fn open_tracker(config: &ResolvedConfig) -> Tracker {
    Tracker::new(Arc::new(JsonFileStorage::new(&config.data_dir)))
}
