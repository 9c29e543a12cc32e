//! Plain JSON file configuration store
//!
//! Fallback for hosts without a usable keychain. Values are written in the
//! clear; the keychain store is preferred whenever it is available.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::debug;

use async_trait::async_trait;

use super::ConfigStore;
use crate::error::{ApiError, Result};

/// On-disk shape of the config file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct ConfigFile {
    /// File format version
    version: u32,
    /// Stored entries (`apiKey`, `apiUrl`)
    entries: HashMap<String, String>,
}

/// JSON file configuration store
pub struct FileStore {
    config_file: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileStore {
    /// Create a new file store rooted at the given directory
    pub fn new(storage_dir: &Path) -> Self {
        let config_file = storage_dir.join("config.json");
        let entries = Self::load_from_file(&config_file).unwrap_or_default();

        Self {
            config_file,
            entries: RwLock::new(entries),
        }
    }

    /// Load entries from the config file
    fn load_from_file(path: &Path) -> Result<HashMap<String, String>> {
        if !path.exists() {
            debug!("No config file found, starting empty");
            return Ok(HashMap::new());
        }

        let contents =
            std::fs::read_to_string(path).map_err(|e| ApiError::Storage(e.to_string()))?;
        let file: ConfigFile =
            serde_json::from_str(&contents).map_err(|e| ApiError::Storage(e.to_string()))?;
        debug!("Loaded config from {:?}", path);
        Ok(file.entries)
    }

    /// Save entries to the config file
    async fn save(&self, entries: &HashMap<String, String>) -> Result<()> {
        let file = ConfigFile {
            version: 1,
            entries: entries.clone(),
        };
        let contents = serde_json::to_string_pretty(&file)
            .map_err(|e| ApiError::Storage(e.to_string()))?;

        if let Some(parent) = self.config_file.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| ApiError::Storage(e.to_string()))?;
        }

        // Write atomically using temp file
        let temp_path = self.config_file.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents)
            .await
            .map_err(|e| ApiError::Storage(e.to_string()))?;
        tokio::fs::rename(&temp_path, &self.config_file)
            .await
            .map_err(|e| ApiError::Storage(e.to_string()))?;

        debug!("Saved config to {:?}", self.config_file);
        Ok(())
    }
}

#[async_trait]
impl ConfigStore for FileStore {
    async fn store(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries).await
    }

    async fn retrieve(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        if entries.remove(key).is_some() {
            self.save(&entries).await?;
        }
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "JSON file"
    }
}
