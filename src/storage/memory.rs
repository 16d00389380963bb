//! In-memory storage implementation for testing.

use std::collections::HashMap;

use anyhow::Result;
use tokio::sync::Mutex;

use super::Storage;

/// In-memory storage for tests and throwaway sessions.
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.lock().await.is_empty()
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Storage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.lock().await;
        Ok(entries.remove(key).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_overwrites_previous_value() -> Result<()> {
        let storage = MemoryStorage::new();
        storage.set("k", "one").await?;
        storage.set("k", "two").await?;

        assert_eq!(storage.get("k").await?.as_deref(), Some("two"));
        assert_eq!(storage.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn remove_reports_presence() -> Result<()> {
        let storage = MemoryStorage::new();
        storage.set("k", "v").await?;

        assert!(storage.remove("k").await?);
        assert!(!storage.remove("k").await?);
        assert!(storage.is_empty().await);
        Ok(())
    }
}
