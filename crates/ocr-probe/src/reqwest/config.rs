//! Reqwest transport configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Configuration for the reqwest HTTP transport.
///
/// Every setting is optional: an empty configuration sends requests with the
/// transport's own defaults and no timeout policy of its own.
#[derive(Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ReqwestConfig {
    /// HTTP request timeout in seconds (transport default when unset)
    #[cfg_attr(
        feature = "config",
        arg(long = "http-timeout", env = "OCR_PROBE_HTTP_TIMEOUT")
    )]
    #[serde(default)]
    pub http_timeout: Option<u64>,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "http-user-agent", env = "OCR_PROBE_HTTP_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Bearer token sent in the `Authorization` header
    #[cfg_attr(
        feature = "config",
        arg(long = "api-key", env = "OCR_PROBE_API_KEY", hide_env_values = true)
    )]
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,

    /// Accept invalid TLS certificates (self-signed test endpoints)
    #[cfg_attr(
        feature = "config",
        arg(long = "accept-invalid-certs", env = "OCR_PROBE_ACCEPT_INVALID_CERTS")
    )]
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl std::fmt::Debug for ReqwestConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestConfig")
            .field("http_timeout", &self.http_timeout)
            .field("user_agent", &self.user_agent)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("accept_invalid_certs", &self.accept_invalid_certs)
            .finish()
    }
}

impl ReqwestConfig {
    /// Returns the configured timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.http_timeout.map(Duration::from_secs)
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(Self::default_user_agent)
    }

    /// Returns the default user agent string.
    fn default_user_agent() -> String {
        format!("ocr-probe/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is zero or the API key is blank.
    pub fn validate(&self) -> Result<()> {
        if self.http_timeout == Some(0) {
            return Err(Error::config(
                "HTTP timeout must be at least 1 second; omit it to use the transport default",
            ));
        }

        if self
            .api_key
            .as_deref()
            .is_some_and(|key| key.trim().is_empty())
        {
            return Err(Error::config("API key must not be blank"));
        }

        Ok(())
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = Some(timeout_secs);
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}
