use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;

use super::Storage;

/// JSON file-based storage implementation.
///
/// Directory structure:
/// ```text
/// data/
///   user_alice.json
///   financeData_alice.json
/// ```
///
/// Keys are percent-encoded into file names, so any username maps to a single
/// file directly inside the data directory.
pub struct JsonFileStorage {
    base_path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(base_path: impl AsRef<Path>) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn file_for(&self, key: &str) -> PathBuf {
        self.base_path
            .join(format!("{}.json", urlencoding::encode(key)))
    }

    async fn ensure_base_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_path)
            .await
            .with_context(|| format!("Failed to create data directory: {:?}", self.base_path))
    }
}

#[async_trait::async_trait]
impl Storage for JsonFileStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.file_for(key);
        match fs::read_to_string(&path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {:?}", path)),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_base_dir().await?;

        // Write beside the target and rename so readers see either the old
        // value or the new one.
        let path = self.file_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)
            .await
            .with_context(|| format!("Failed to write {:?}", tmp))?;
        fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("Failed to replace {:?}", path))?;

        tracing::debug!(key, path = %path.display(), "Stored value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        let path = self.file_for(key);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to delete {:?}", path)),
        }
    }
}
