//! Client configuration: the scoped key-value store and the API key type
//!
//! The store holds exactly two string entries, [`API_KEY`] and [`API_URL`],
//! written only through the client's setters and read before every request.

mod file;
mod keychain;
mod memory;
mod traits;

pub use file::FileStore;
pub use keychain::KeychainStore;
pub use memory::MemoryStore;
pub use traits::ConfigStore;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Store key for the API key
pub const API_KEY: &str = "apiKey";

/// Store key for the base URL
pub const API_URL: &str = "apiUrl";

/// Expected API key length: 32 bytes hex-encoded
const API_KEY_LEN: usize = 64;

/// Check that a key is exactly 64 hexadecimal characters (either case).
///
/// The client itself never rejects a malformed key; settings flows and the
/// connection monitor validate before storing or probing.
pub fn is_valid_api_key(key: &str) -> bool {
    key.len() == API_KEY_LEN && hex::decode(key).is_ok()
}

/// API key material - automatically zeroed when dropped
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct ApiKey {
    value: String,
}

impl ApiKey {
    /// Wrap a key string
    pub fn new(value: String) -> Self {
        Self { value }
    }

    /// Get the key value (use carefully)
    pub fn expose(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("value", &"[REDACTED]")
            .finish()
    }
}
