//! OS keychain configuration store
//!
//! Uses the system keychain for the API key and base URL:
//! - macOS: Keychain
//! - Windows: Credential Manager (DPAPI)
//! - Linux: Secret Service (GNOME Keyring, KWallet)

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use super::ConfigStore;
use crate::error::{ApiError, Result};

/// Service name used for keychain entries
const SERVICE_NAME: &str = "bpassword";

/// OS keychain configuration store
pub struct KeychainStore {
    /// Prefix for all keys (for namespacing)
    prefix: String,
    /// Whether the keychain is available
    available: bool,
}

impl KeychainStore {
    /// Create a new keychain store with optional prefix
    pub fn new(prefix: Option<&str>) -> Self {
        let prefix = prefix.map(|p| format!("{}-", p)).unwrap_or_default();

        let available = Self::test_availability();

        if available {
            debug!("Keychain store is available");
        } else {
            warn!("Keychain store is not available - will use fallback");
        }

        Self { prefix, available }
    }

    /// Test if the keychain is available
    fn test_availability() -> bool {
        let test_entry = Entry::new(SERVICE_NAME, "__test_availability__");
        match test_entry {
            Ok(entry) => {
                let result = entry.set_password("test");
                if result.is_ok() {
                    let _ = entry.delete_password();
                    true
                } else {
                    false
                }
            }
            Err(_) => false,
        }
    }

    /// Get a keyring entry for a key
    fn get_entry(&self, key: &str) -> Result<Entry> {
        let full_key = format!("{}{}", self.prefix, key);
        Entry::new(SERVICE_NAME, &full_key).map_err(|e| ApiError::Storage(e.to_string()))
    }

    /// Check if the keychain is available
    pub fn is_available(&self) -> bool {
        self.available
    }

    fn ensure_available(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(ApiError::Storage("Keychain not available".to_string()))
        }
    }
}

#[async_trait]
impl ConfigStore for KeychainStore {
    async fn store(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_available()?;

        let entry = self.get_entry(key)?;
        entry
            .set_password(value)
            .map_err(|e| ApiError::Storage(e.to_string()))?;

        debug!("Stored key in keychain: {}", key);
        Ok(())
    }

    async fn retrieve(&self, key: &str) -> Result<Option<String>> {
        self.ensure_available()?;

        let entry = self.get_entry(key)?;
        match entry.get_password() {
            Ok(value) => {
                debug!("Retrieved key from keychain: {}", key);
                Ok(Some(value))
            }
            Err(keyring::Error::NoEntry) => {
                debug!("Key not found in keychain: {}", key);
                Ok(None)
            }
            Err(e) => Err(ApiError::Storage(e.to_string())),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.ensure_available()?;

        let entry = self.get_entry(key)?;
        match entry.delete_password() {
            Ok(()) => {
                debug!("Deleted key from keychain: {}", key);
                Ok(())
            }
            // Key doesn't exist, that's fine
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(ApiError::Storage(e.to_string())),
        }
    }

    fn backend_name(&self) -> &'static str {
        #[cfg(target_os = "macos")]
        return "macOS Keychain";

        #[cfg(target_os = "windows")]
        return "Windows Credential Manager";

        #[cfg(target_os = "linux")]
        return "Linux Secret Service";

        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        return "System Keychain";
    }
}
