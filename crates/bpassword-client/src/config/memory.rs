//! In-memory configuration store
//!
//! Backend for tests and for callers that manage configuration lifetime
//! themselves. Nothing is persisted.

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::ConfigStore;
use crate::error::Result;

/// In-memory configuration store
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn store(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.remove(key);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "in-memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.retrieve("apiKey").await.unwrap(), None);

        store.store("apiKey", "deadbeef").await.unwrap();
        assert_eq!(
            store.retrieve("apiKey").await.unwrap(),
            Some("deadbeef".to_string())
        );

        store.delete("apiKey").await.unwrap();
        assert_eq!(store.retrieve("apiKey").await.unwrap(), None);
    }
}
