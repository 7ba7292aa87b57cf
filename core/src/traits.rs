//! Seams between the import pipeline and the outside world

use crate::errors::TransportResult;
use crate::types::{ConnectorLog, SourceId};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

/// Delivers encoded payloads and logs to the Insights server
#[async_trait]
pub trait Transport: Send + Sync {
    /// Replace the server-side snapshot of a source with the given compressed payload
    async fn reload_source_snapshot(&self, source_id: SourceId, payload: Bytes) -> TransportResult<()>;

    /// Append connector logs for a source
    async fn create_connector_logs(&self, source_id: SourceId, logs: Vec<ConnectorLog>) -> TransportResult<()>;
}

/// Source of the current instant, used to stamp connector logs
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
