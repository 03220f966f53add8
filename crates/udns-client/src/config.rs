// Client configuration
//
// Credentials and endpoint for the UltraDNS REST API. Loaded from the
// environment by the binaries, or deserialized from JSON by embedders.

use serde::{Deserialize, Serialize};
use udns_core::{Error, Result};

/// Production REST endpoint
pub const DEFAULT_BASE_URL: &str = "https://restapi.ultradns.com/v1";

/// Default HTTP timeout for API requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`crate::UltraDnsClient`]
///
/// # Security
///
/// The Debug implementation does NOT expose the password.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    pub username: String,

    /// ⚠️ NEVER log this value
    pub password: String,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl ClientConfig {
    /// Settings for the production endpoint
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }

    /// Load configuration from environment variables
    ///
    /// - `UDNS_USERNAME` (required)
    /// - `UDNS_PASSWORD` (required)
    /// - `UDNS_BASE_URL` (default: production endpoint)
    /// - `UDNS_TIMEOUT_SECS` (default: 30)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let username = lookup("UDNS_USERNAME")
            .ok_or_else(|| Error::config("UDNS_USERNAME is required"))?;
        let password = lookup("UDNS_PASSWORD")
            .ok_or_else(|| Error::config("UDNS_PASSWORD is required"))?;
        let timeout_secs = match lookup("UDNS_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                Error::config(format!("UDNS_TIMEOUT_SECS must be a number of seconds, got {:?}", raw))
            })?,
            None => default_timeout_secs(),
        };

        let config = Self {
            username,
            password,
            base_url: lookup("UDNS_BASE_URL").unwrap_or_else(default_base_url),
            timeout_secs,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(Error::config("UltraDNS username cannot be empty"));
        }
        if self.password.is_empty() {
            return Err(Error::config("UltraDNS password cannot be empty"));
        }
        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(Error::config(format!(
                "UltraDNS base URL must use http or https: {}",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("UltraDNS timeout must be > 0"));
        }
        Ok(())
    }

    /// Base URL without a trailing slash
    pub(crate) fn endpoint(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
