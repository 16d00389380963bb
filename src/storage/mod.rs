//! Key-value persistence for credential records and ledgers.
//!
//! Every value is a whole JSON document stored under a string key. Writers
//! replace the full value; there are no partial updates or merges.

mod json_file;
mod keys;
mod memory;

pub use json_file::JsonFileStorage;
pub use keys::{credential_key, ledger_key, CREDENTIAL_KEY_PREFIX, LEDGER_KEY_PREFIX};
pub use memory::MemoryStorage;

use anyhow::Result;

/// Storage trait for persisting serialized blobs by key.
#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// Returns `Ok(None)` if nothing has been stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`. Last writer wins.
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Returns whether a value was present.
    async fn remove(&self, key: &str) -> Result<bool>;
}
