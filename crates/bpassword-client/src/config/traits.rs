//! Configuration store trait definitions

use crate::error::Result;
use async_trait::async_trait;

/// Trait for the scoped key-value store backing client configuration.
///
/// Exactly two keys are ever used: [`API_KEY`](crate::config::API_KEY) and
/// [`API_URL`](crate::config::API_URL). The store is injected into the client
/// so tests can substitute an in-memory double.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Store a value under the given key
    async fn store(&self, key: &str, value: &str) -> Result<()>;

    /// Retrieve a value by key, or `None` if unset
    async fn retrieve(&self, key: &str) -> Result<Option<String>>;

    /// Delete a value by key; deleting an absent key is not an error
    async fn delete(&self, key: &str) -> Result<()>;

    /// Get a human-readable name for this storage backend
    fn backend_name(&self) -> &'static str;
}
