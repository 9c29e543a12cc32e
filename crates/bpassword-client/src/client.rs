//! Authenticated REST client for the credential service
//!
//! Wraps the HTTP contract behind a small async operation set and translates
//! failures into the [`ApiError`] taxonomy. The configuration store is
//! injected so callers (and tests) control where the key lives.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::{ApiKey, ConfigStore, API_KEY, API_URL};
use crate::credential::{Credential, CredentialDraft};
use crate::error::{ApiError, Result};

/// Default service endpoint, used when no base URL is stored
pub const DEFAULT_API_URL: &str = "https://bpassword.b-services.be/api/";

/// Options for a single [`ApiClient::request`] call
#[derive(Debug, Default)]
pub struct RequestOptions {
    /// HTTP method
    pub method: Method,
    /// JSON body, sent verbatim
    pub body: Option<Value>,
    /// Extra headers; these override the client's defaults on name collision
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    /// Create options for the given method
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    /// Attach a JSON body
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach an extra header
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Outcome of [`ApiClient::test_connection`] - never surfaced as an `Err`
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionTest {
    /// Whether an authenticated list round-trip succeeded
    pub success: bool,
    /// Human-readable outcome, suitable for display verbatim
    pub message: String,
}

/// Error body shape the server uses for non-2xx responses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

/// Credential API client
pub struct ApiClient {
    /// Configuration store (API key and base URL)
    store: Arc<dyn ConfigStore>,
    /// HTTP client; follows redirects, no caching, no client-side timeout
    http: reqwest::Client,
}

impl ApiClient {
    /// Create a new client over the given configuration store
    pub fn new(store: Arc<dyn ConfigStore>) -> Self {
        Self {
            store,
            http: reqwest::Client::new(),
        }
    }

    /// Read the stored API key, if any
    pub async fn api_key(&self) -> Result<Option<ApiKey>> {
        Ok(self.store.retrieve(API_KEY).await?.map(ApiKey::new))
    }

    /// Store the API key. No format validation happens here; settings flows
    /// validate with [`crate::config::is_valid_api_key`] before storing.
    pub async fn set_api_key(&self, key: &str) -> Result<()> {
        self.store.store(API_KEY, key).await
    }

    /// Remove the stored API key (logout)
    pub async fn clear_api_key(&self) -> Result<()> {
        self.store.delete(API_KEY).await
    }

    /// The configured base URL, normalized to exactly one trailing slash.
    /// Falls back to [`DEFAULT_API_URL`] when unset.
    pub async fn api_url(&self) -> Result<String> {
        let url = self
            .store
            .retrieve(API_URL)
            .await?
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Ok(format!("{}/", url.trim_end_matches('/')))
    }

    /// Store the base URL
    pub async fn set_api_url(&self, url: &str) -> Result<()> {
        self.store.store(API_URL, url).await
    }

    /// Name of the backing configuration store
    pub fn store_backend(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Issue an authenticated request against a relative endpoint path.
    ///
    /// Fails with [`ApiError::NotConfigured`] before any network I/O when no
    /// API key is stored. The endpoint is concatenated onto the normalized
    /// base URL, so it must not carry a leading slash. Resolves to `None` for
    /// 204 No Content and to the parsed JSON body otherwise.
    pub async fn request(&self, endpoint: &str, options: RequestOptions) -> Result<Option<Value>> {
        let api_key = self.api_key().await?.ok_or(ApiError::NotConfigured)?;
        let base_url = self.api_url().await?;
        let url = format!("{}{}", base_url, endpoint);

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Api-Key {}", api_key.expose()))
                .map_err(|e| ApiError::Unknown(e.to_string()))?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &options.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ApiError::Unknown(e.to_string()))?;
            let value =
                HeaderValue::from_str(value).map_err(|e| ApiError::Unknown(e.to_string()))?;
            // insert, not append: caller headers replace the defaults
            headers.insert(name, value);
        }

        debug!("{} {}", options.method, url);

        let mut request = self.http.request(options.method, &url).headers(headers);
        if let Some(body) = &options.body {
            request = request.body(body.to_string());
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Self::map_error_status(status, response).await);
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        let text = response.text().await?;
        let value = serde_json::from_str(&text)
            .map_err(|e| ApiError::Unknown(format!("Invalid JSON response: {}", e)))?;
        Ok(Some(value))
    }

    /// Deterministic mapping from a non-2xx status to an error
    async fn map_error_status(status: StatusCode, response: reqwest::Response) -> ApiError {
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound,
            429 => ApiError::RateLimited,
            _ => {
                warn!("Request failed with status {}", status);
                let detail = response
                    .text()
                    .await
                    .ok()
                    .and_then(|text| serde_json::from_str::<ErrorBody>(&text).ok())
                    .and_then(|body| body.detail);
                ApiError::RequestFailed(detail.unwrap_or_else(|| "Request failed".to_string()))
            }
        }
    }

    /// Decode a JSON response body into a typed value
    fn decode<T: DeserializeOwned>(value: Option<Value>) -> Result<T> {
        let value =
            value.ok_or_else(|| ApiError::Unknown("Unexpected empty response".to_string()))?;
        serde_json::from_value(value)
            .map_err(|e| ApiError::Unknown(format!("Unexpected response shape: {}", e)))
    }

    /// List credentials, optionally filtered by a search query.
    ///
    /// Order is whatever the server returns; no client-side sort.
    pub async fn list_credentials(&self, query: Option<&str>) -> Result<Vec<Credential>> {
        let endpoint = match query {
            Some(q) if !q.is_empty() => format!("credentials/?q={}", urlencoding::encode(q)),
            _ => "credentials".to_string(),
        };
        let value = self.request(&endpoint, RequestOptions::new(Method::GET)).await?;
        Self::decode(value)
    }

    /// Fetch a single credential by id
    pub async fn get_credential(&self, id: i64) -> Result<Credential> {
        let value = self
            .request(&format!("credentials/{}/", id), RequestOptions::new(Method::GET))
            .await?;
        Self::decode(value)
    }

    /// Create a credential; returns the record with its server-assigned id
    pub async fn create_credential(&self, draft: &CredentialDraft) -> Result<Credential> {
        let body = serde_json::to_value(draft).map_err(|e| ApiError::Unknown(e.to_string()))?;
        let value = self
            .request("credentials/", RequestOptions::new(Method::POST).with_body(body))
            .await?;
        Self::decode(value)
    }

    /// Replace a credential wholesale; returns the updated record
    pub async fn update_credential(&self, id: i64, draft: &CredentialDraft) -> Result<Credential> {
        let body = serde_json::to_value(draft).map_err(|e| ApiError::Unknown(e.to_string()))?;
        let value = self
            .request(
                &format!("credentials/{}/", id),
                RequestOptions::new(Method::PUT).with_body(body),
            )
            .await?;
        Self::decode(value)
    }

    /// Delete a credential by id
    pub async fn delete_credential(&self, id: i64) -> Result<()> {
        self.request(
            &format!("credentials/{}/", id),
            RequestOptions::new(Method::DELETE),
        )
        .await?;
        Ok(())
    }

    /// Probe the service with an authenticated list call.
    ///
    /// The one operation with catch-all semantics: every failure becomes a
    /// `{success: false, message}` value instead of an error.
    pub async fn test_connection(&self) -> ConnectionTest {
        match self.list_credentials(None).await {
            Ok(_) => ConnectionTest {
                success: true,
                message: "Connection successful!".to_string(),
            },
            Err(err) => ConnectionTest {
                success: false,
                message: err.to_string(),
            },
        }
    }
}
