//! Configuration for the HTTP transport

use insights_core::Config;
use serde::{Deserialize, Serialize};

/// HTTP transport configuration
#[derive(Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Base URL of the server API, without trailing slash
    pub base_url: String,
    /// Token of the custom source, used as Basic auth password
    pub source_token: String,
    /// Request timeout in milliseconds (None = no timeout)
    pub timeout_ms: Option<u64>,
    /// User-Agent header value
    pub user_agent: String,
}

impl HttpConfig {
    /// Create a new HTTP config for the given server and token
    pub fn new(base_url: impl Into<String>, source_token: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            source_token: source_token.into(),
            timeout_ms: Some(30_000),
            user_agent: concat!("insights-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Set request timeout
    pub fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Disable the request timeout
    pub fn without_timeout(mut self) -> Self {
        self.timeout_ms = None;
        self
    }

    /// Set the User-Agent header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// URL of a custom-source endpoint
    pub fn source_url(&self, source_id: impl std::fmt::Display, path: &str) -> String {
        format!("{}/custom-sources/{}/{}", self.base_url, source_id, path)
    }
}

impl From<&Config> for HttpConfig {
    fn from(config: &Config) -> Self {
        Self::new(config.base_url.clone(), config.source_token.clone())
    }
}

impl std::fmt::Debug for HttpConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpConfig")
            .field("base_url", &self.base_url)
            .field("source_token", &"<redacted>")
            .field("timeout_ms", &self.timeout_ms)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
