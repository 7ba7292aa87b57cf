//! HTTP transport for the Insights client
//!
//! Sends import payloads and connector logs to the custom-source endpoints of an
//! Insights server, authenticating with the source id and token.

use async_trait::async_trait;
use bytes::Bytes;
use insights_core::prelude::*;
use reqwest::header::{CONTENT_ENCODING, CONTENT_TYPE};
use reqwest::{Client, Response};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error};

mod config;

pub use config::HttpConfig;

/// reqwest implementation of Transport
pub struct HttpTransport {
    client: Client,
    config: HttpConfig,
}

impl HttpTransport {
    /// Create a new HTTP transport
    pub fn new(config: HttpConfig) -> Result<Self, TransportError> {
        let mut builder = Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout_ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        let client = builder
            .build()
            .map_err(|e| TransportError::ClientBuild(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Get the configuration
    pub fn config(&self) -> &HttpConfig {
        &self.config
    }

    /// Map a non-success response to an API error
    async fn check_response(response: Response) -> TransportResult<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        error!("Insights API error {}: {}", status, body);

        Err(TransportError::Api {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn reload_source_snapshot(&self, source_id: SourceId, payload: Bytes) -> TransportResult<()> {
        let url = self.config.source_url(source_id, "snapshots");
        debug!("POST {} ({} bytes)", url, payload.len());

        let response = self
            .client
            .post(&url)
            .basic_auth(source_id.to_string(), Some(&self.config.source_token))
            .header(CONTENT_TYPE, "application/json")
            .header(CONTENT_ENCODING, "deflate")
            .body(payload)
            .send()
            .await
            .map_err(|e| TransportError::Network(format!("HTTP request failed: {}", e)))?;

        Self::check_response(response).await
    }

    async fn create_connector_logs(&self, source_id: SourceId, logs: Vec<ConnectorLog>) -> TransportResult<()> {
        let url = self.config.source_url(source_id, "connector-logs");
        debug!("POST {} ({} logs)", url, logs.len());

        let response = self
            .client
            .post(&url)
            .basic_auth(source_id.to_string(), Some(&self.config.source_token))
            .json(&logs)
            .send()
            .await
            .map_err(|e| {
                if e.is_builder() {
                    TransportError::Serialization(e.to_string())
                } else {
                    TransportError::Network(format!("HTTP request failed: {}", e))
                }
            })?;

        Self::check_response(response).await
    }
}

/// Build a client for the configured source that talks HTTP
pub fn connect(config: &Config) -> Result<InsightsClient, TransportError> {
    connect_with(config, HttpConfig::from(config))
}

/// Build a client with explicit HTTP settings
pub fn connect_with(config: &Config, http: HttpConfig) -> Result<InsightsClient, TransportError> {
    let transport = HttpTransport::new(http)?;
    Ok(InsightsClient::new(config.source_id, Arc::new(transport)))
}
