//! Connection status monitoring
//!
//! Owns the current connection state behind an explicit coordinator instead
//! of a module-level flag. UI surfaces poll [`ConnectionMonitor::refresh`]
//! and receive a value; nothing reads shared mutable state directly.

use serde::Serialize;
use tokio::sync::RwLock;
use tracing::debug;

use crate::client::ApiClient;
use crate::config::is_valid_api_key;

/// Connection state as of the last refresh
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ConnectionStatus {
    /// No refresh has run yet
    Unknown,
    /// No API key is stored
    NotConfigured,
    /// The last probe succeeded
    Connected,
    /// The last probe failed
    Disconnected {
        /// Why, suitable for display verbatim
        message: String,
    },
}

/// Coordinator owning the connection status
pub struct ConnectionMonitor {
    client: ApiClient,
    status: RwLock<ConnectionStatus>,
}

impl ConnectionMonitor {
    /// Create a monitor over the given client
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            status: RwLock::new(ConnectionStatus::Unknown),
        }
    }

    /// Re-derive the connection status, store it, and return it.
    ///
    /// A missing key short-circuits to `NotConfigured` and a malformed key to
    /// `Disconnected`, both without network I/O; otherwise the service is
    /// probed with an authenticated list call. Never returns an error - any
    /// failure becomes a `Disconnected` value.
    pub async fn refresh(&self) -> ConnectionStatus {
        let status = self.derive_status().await;
        debug!("Connection status: {:?}", status);

        let mut current = self.status.write().await;
        *current = status.clone();
        status
    }

    /// The status as of the last refresh, without probing
    pub async fn current(&self) -> ConnectionStatus {
        self.status.read().await.clone()
    }

    async fn derive_status(&self) -> ConnectionStatus {
        let key = match self.client.api_key().await {
            Ok(Some(key)) => key,
            Ok(None) => return ConnectionStatus::NotConfigured,
            Err(err) => {
                return ConnectionStatus::Disconnected {
                    message: err.to_string(),
                }
            }
        };

        if !is_valid_api_key(key.expose()) {
            return ConnectionStatus::Disconnected {
                message: "API key must be 64 hexadecimal characters".to_string(),
            };
        }

        let probe = self.client.test_connection().await;
        if probe.success {
            ConnectionStatus::Connected
        } else {
            ConnectionStatus::Disconnected {
                message: probe.message,
            }
        }
    }
}
