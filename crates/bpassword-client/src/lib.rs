//! # bpassword-client
//!
//! Client library for the BPassword credential service including:
//! - Authenticated REST client with normalized error taxonomy
//! - Pluggable configuration store (OS keychain, JSON file, in-memory)
//! - Connection status monitoring with explicit refresh
//! - Password generation

pub mod client;
pub mod config;
pub mod credential;
pub mod error;
pub mod generator;
pub mod status;

pub use client::{ApiClient, ConnectionTest, RequestOptions, DEFAULT_API_URL};
pub use config::{is_valid_api_key, ApiKey, ConfigStore, FileStore, KeychainStore, MemoryStore};
pub use credential::{Credential, CredentialDraft};
pub use error::{ApiError, Result};
pub use generator::{generate_password, DEFAULT_LENGTH};
pub use status::{ConnectionMonitor, ConnectionStatus};
