// # UltraDNS REST Client
//
// This crate implements the `RemoteStore` trait of `udns-core` over the
// UltraDNS REST API v1, for RRSets (records and pools), probes and
// notifications.
//
// ## Behavior
//
// - One HTTP request per store call (plus a one-time token request)
// - HTTP timeout configured (30 seconds by default)
// - Error envelopes returned verbatim as `StoreError::Responses`
// - Connection failures and unreadable bodies as `StoreError::Transport`
// - NO retry logic (a failed call is reported as it happened)
// - A 401 drops the cached token; the next call authenticates again
// - NO interpretation of error codes (owned by the classifier)
//
// ## Security Requirements
//
// - Password and access token NEVER appear in logs or Debug output
// - Construction fails fast on empty credentials
//
// ## API Reference
//
// - Token: POST `/authorization/token` (password grant)
// - Path segments (zone, owner, email) are percent-encoded
// - RRSets: `/zones/:zone/rrsets/:type/:name`
// - Probes: `/zones/:zone/rrsets/ANY/:name/probes[/:id]`
// - Notifications: `/zones/:zone/rrsets/:type/:name/notifications/:email`

pub mod config;
mod stores;

pub use config::ClientConfig;

use reqwest::header::{HeaderMap, LOCATION};
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use udns_core::traits::{Ack, ErrorResponse, StoreError};
use udns_core::{Error, Result};

/// Response header carrying a server-assigned id
const ID_HEADER: &str = "id";

/// UltraDNS REST client
///
/// Clones share the HTTP connection pool and the cached access token, so
/// one client can back several engines.
#[derive(Clone)]
pub struct UltraDnsClient {
    config: ClientConfig,

    /// Parsed base URL; request paths are appended segment by segment
    endpoint: Url,

    /// HTTP client for API requests
    http: reqwest::Client,

    /// Bearer token, fetched on first use and dropped when rejected
    /// ⚠️ NEVER log this value
    token: Arc<RwLock<Option<String>>>,
}

// Custom Debug implementation that hides the credentials
impl std::fmt::Debug for UltraDnsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UltraDnsClient")
            .field("config", &self.config)
            .field("token", &"<REDACTED>")
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    access_token: String,
}

/// Error bodies come as a list of entries or, for some endpoints, a single one
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorEnvelope {
    List(Vec<ErrorResponse>),
    Single(ErrorResponse),
}

impl UltraDnsClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// `Error::Config` if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let endpoint = Url::parse(config.endpoint())
            .map_err(|e| Error::config(format!("Invalid UltraDNS base URL {}: {}", config.base_url, e)))?;
        if endpoint.cannot_be_a_base() {
            return Err(Error::config(format!(
                "UltraDNS base URL cannot carry a path: {}",
                config.base_url
            )));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            config,
            endpoint,
            http,
            token: Arc::new(RwLock::new(None)),
        })
    }

    /// Create a client from `UDNS_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Settings this client was built with
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Endpoint URL with `segments` appended, each percent-encoded
    fn url(&self, segments: &[&str]) -> std::result::Result<Url, StoreError> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Transport(format!("{} cannot carry a path", self.endpoint)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Bearer token, requesting one if none is cached
    ///
    /// ```http
    /// POST /authorization/token
    /// Content-Type: application/x-www-form-urlencoded
    ///
    /// grant_type=password&username=...&password=...
    /// ```
    async fn access_token(&self) -> std::result::Result<String, StoreError> {
        if let Some(token) = self.token.read().await.as_ref() {
            return Ok(token.clone());
        }

        let mut cached = self.token.write().await;
        // Another task may have fetched it while we waited
        if let Some(token) = cached.as_ref() {
            return Ok(token.clone());
        }

        tracing::debug!("Requesting UltraDNS access token for {}", self.config.username);
        let response = self
            .http
            .post(self.url(&["authorization", "token"])?)
            .form(&[
                ("grant_type", "password"),
                ("username", self.config.username.as_str()),
                ("password", self.config.password.as_str()),
            ])
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("HTTP request failed: {}", e)))?;

        let response = check(response).await?;
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Transport(format!("Failed to parse token response: {}", e)))?;

        *cached = Some(body.access_token.clone());
        Ok(body.access_token)
    }

    /// Authorize and send a request, turning error statuses into `StoreError`
    pub(crate) async fn execute(
        &self,
        request: RequestBuilder,
    ) -> std::result::Result<Response, StoreError> {
        let token = self.access_token().await?;
        let response = request
            .bearer_auth(&token)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| StoreError::Transport(format!("HTTP request failed: {}", e)))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            self.forget_token(&token).await;
        }
        check(response).await
    }

    /// Drop the cached token if it is still the one that was rejected
    async fn forget_token(&self, rejected: &str) {
        let mut cached = self.token.write().await;
        if cached.as_deref() == Some(rejected) {
            tracing::debug!("UltraDNS rejected the access token, requesting a new one on next use");
            *cached = None;
        }
    }

    pub(crate) fn get_request(&self, path: &[&str]) -> std::result::Result<RequestBuilder, StoreError> {
        Ok(self.http.get(self.url(path)?))
    }

    pub(crate) fn post_request(&self, path: &[&str]) -> std::result::Result<RequestBuilder, StoreError> {
        Ok(self.http.post(self.url(path)?))
    }

    pub(crate) fn put_request(&self, path: &[&str]) -> std::result::Result<RequestBuilder, StoreError> {
        Ok(self.http.put(self.url(path)?))
    }

    pub(crate) fn delete_request(&self, path: &[&str]) -> std::result::Result<RequestBuilder, StoreError> {
        Ok(self.http.delete(self.url(path)?))
    }
}

/// Pass successful responses through, parse the error envelope otherwise
async fn check(response: Response) -> std::result::Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());
    tracing::debug!("UltraDNS answered {}: {}", status, body);
    Err(parse_error_body(status, &body))
}

/// Map an error body onto `StoreError`
fn parse_error_body(status: StatusCode, body: &str) -> StoreError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope::List(errors)) if !errors.is_empty() => StoreError::Responses(errors),
        Ok(ErrorEnvelope::Single(error)) => StoreError::Responses(vec![error]),
        _ => StoreError::Transport(format!("HTTP {}: {}", status, body)),
    }
}

/// Acknowledgement from the `Location` and `ID` response headers
pub(crate) fn ack_from(headers: &HeaderMap) -> Ack {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    Ack {
        location: header(LOCATION.as_str()),
        id: header(ID_HEADER),
    }
}

/// Decode a JSON response body
pub(crate) async fn json_body<T: serde::de::DeserializeOwned>(
    response: Response,
) -> std::result::Result<T, StoreError> {
    response
        .json()
        .await
        .map_err(|e| StoreError::Transport(format!("Failed to parse response: {}", e)))
}
