//! High-level client: imports and connector logs for one source

use crate::errors::InsightsResult;
use crate::graph::Graph;
use crate::pipeline::{encode_with, EncodeStats, PipelineStage};
use crate::traits::{Clock, SystemClock, Transport};
use crate::types::{ConnectorLog, LogLevel, SourceId};
use flate2::Compression;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info};

/// Client bound to one custom source
#[derive(Clone)]
pub struct InsightsClient {
    source_id: SourceId,
    transport: Arc<dyn Transport>,
    clock: Arc<dyn Clock>,
    compression: Compression,
}

impl InsightsClient {
    /// Create a client that sends through the given transport
    pub fn new(source_id: SourceId, transport: Arc<dyn Transport>) -> Self {
        Self {
            source_id,
            transport,
            clock: Arc::new(SystemClock),
            compression: Compression::default(),
        }
    }

    /// Use another clock to stamp connector logs
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Set the deflate compression level for import payloads
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    pub fn source_id(&self) -> SourceId {
        self.source_id
    }

    /// Send the given entities, relationships and stream items to the server.
    ///
    /// The whole graph is encoded before anything is sent. If any source fails,
    /// the transport is never called and the source's error is returned.
    pub async fn perform_import(&self, graph: Graph<'_>) -> InsightsResult<()> {
        debug!("Starting import for source {}", self.source_id);
        let start_time = Instant::now();

        let stats = self.encode_and_upload(graph).await.map_err(|e| {
            error!(
                "Import for source {} failed during {} stage: {}",
                self.source_id,
                PipelineStage::of_error(&e),
                e
            );
            e
        })?;

        info!(
            "Import for source {} completed in {}ms: {} bytes uploaded ({} bytes uncompressed)",
            self.source_id,
            start_time.elapsed().as_millis(),
            stats.compressed_bytes,
            stats.uncompressed_bytes
        );

        Ok(())
    }

    async fn encode_and_upload(&self, graph: Graph<'_>) -> InsightsResult<EncodeStats> {
        let encoded = encode_with(graph, self.compression).await?;
        self.transport
            .reload_source_snapshot(self.source_id, encoded.payload)
            .await?;
        Ok(encoded.stats)
    }

    /// Send a warning log
    pub async fn log_alert(&self, message: impl Into<String>) -> InsightsResult<()> {
        self.log(LogLevel::Alert, message.into()).await
    }

    /// Send an informational log
    pub async fn log_info(&self, message: impl Into<String>) -> InsightsResult<()> {
        self.log(LogLevel::Info, message.into()).await
    }

    async fn log(&self, level: LogLevel, message: String) -> InsightsResult<()> {
        let log = ConnectorLog::new(level, message, self.clock.now());
        self.transport
            .create_connector_logs(self.source_id, vec![log])
            .await?;

        info!("Sent {} log for source {}", level, self.source_id);
        Ok(())
    }
}

impl std::fmt::Debug for InsightsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightsClient")
            .field("source_id", &self.source_id)
            .field("compression", &self.compression.level())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{BoxError, InsightsError, TransportError, TransportResult};
    use crate::graph::{GraphDocument, Source};
    use crate::types::{Entity, Relationship, StreamItem};
    use async_trait::async_trait;
    use bytes::Bytes;
    use chrono::{DateTime, TimeZone, Utc};
    use flate2::read::ZlibDecoder;
    use futures::stream;
    use std::io::Read;
    use std::sync::Mutex;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Snapshot(SourceId, Bytes),
        Logs(SourceId, Vec<ConnectorLog>),
    }

    #[derive(Default)]
    struct RecordingTransport {
        calls: Mutex<Vec<Call>>,
        reject: bool,
    }

    impl RecordingTransport {
        fn rejecting() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                reject: true,
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn record(&self, call: Call) -> TransportResult<()> {
            self.calls.lock().unwrap().push(call);
            if self.reject {
                return Err(TransportError::Api {
                    status: 401,
                    body: "invalid source token".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn reload_source_snapshot(&self, source_id: SourceId, payload: Bytes) -> TransportResult<()> {
            self.record(Call::Snapshot(source_id, payload))
        }

        async fn create_connector_logs(&self, source_id: SourceId, logs: Vec<ConnectorLog>) -> TransportResult<()> {
            self.record(Call::Logs(source_id, logs))
        }
    }

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn inflate(payload: &[u8]) -> String {
        let mut decoder = ZlibDecoder::new(payload);
        let mut text = String::new();
        decoder.read_to_string(&mut text).unwrap();
        text
    }

    fn client(transport: Arc<RecordingTransport>) -> InsightsClient {
        InsightsClient::new(SourceId::new(1), transport)
    }

    #[tokio::test]
    async fn test_import_sends_one_snapshot() {
        let transport = Arc::new(RecordingTransport::default());
        let document = GraphDocument {
            entities: vec![Entity::new("e1", "E1", "user"), Entity::new("e2", "E2", "user")],
            relationships: vec![Relationship::new("e1", "user", "e2", "user")],
            stream_items: vec![StreamItem::from(Entity::new("s1", "S1", "user"))],
        };
        let expected = serde_json::to_string(&document).unwrap();

        client(transport.clone())
            .perform_import(Graph::from(document))
            .await
            .unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        match &calls[0] {
            Call::Snapshot(source_id, payload) => {
                assert_eq!(*source_id, SourceId::new(1));
                assert_eq!(inflate(payload), expected);
            }
            other => panic!("unexpected call: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_import_still_uploads() {
        let transport = Arc::new(RecordingTransport::default());
        client(transport.clone())
            .perform_import(Graph::empty())
            .await
            .unwrap();

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        let Call::Snapshot(_, payload) = &calls[0] else {
            panic!("expected a snapshot upload");
        };
        assert_eq!(inflate(payload), r#"{"entities":[],"relationships":[],"streamItems":[]}"#);
    }

    #[tokio::test]
    async fn test_source_failure_skips_transport() {
        let transport = Arc::new(RecordingTransport::default());
        let entities = stream::iter(vec![
            Ok(Entity::new("e1", "E1", "user")),
            Err::<Entity, BoxError>("directory unreachable".into()),
            Ok(Entity::new("e2", "E2", "user")),
        ]);
        let graph = Graph::new(
            Source::from_try_stream(entities),
            Vec::<Relationship>::new(),
            Vec::<StreamItem>::new(),
        );

        let err = client(transport.clone()).perform_import(graph).await.unwrap_err();
        assert!(matches!(err, InsightsError::Source(_)));
        assert_eq!(PipelineStage::of_error(&err), PipelineStage::Serialize);
        assert_eq!(err.to_string(), "directory unreachable");
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_surfaced() {
        let transport = Arc::new(RecordingTransport::rejecting());
        let result = client(transport.clone()).perform_import(Graph::empty()).await;

        let err = tokio_test::assert_err!(result);
        assert!(matches!(
            err,
            InsightsError::Transport(TransportError::Api { status: 401, .. })
        ));
        assert_eq!(PipelineStage::of_error(&err), PipelineStage::Upload);
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_logs_use_injected_clock() {
        let transport = Arc::new(RecordingTransport::default());
        let now = Utc.with_ymd_and_hms(2024, 5, 6, 7, 8, 9).unwrap();
        let client = client(transport.clone()).with_clock(Arc::new(FixedClock(now)));

        tokio_test::assert_ok!(client.log_alert("token expires soon").await);
        tokio_test::assert_ok!(client.log_info("import started").await);

        assert_eq!(
            transport.calls(),
            vec![
                Call::Logs(
                    SourceId::new(1),
                    vec![ConnectorLog::new(LogLevel::Alert, "token expires soon", now)]
                ),
                Call::Logs(
                    SourceId::new(1),
                    vec![ConnectorLog::new(LogLevel::Info, "import started", now)]
                ),
            ]
        );
    }

    #[tokio::test]
    async fn test_log_failure_is_surfaced() {
        let transport = Arc::new(RecordingTransport::rejecting());
        let err = client(transport).log_info("hello").await.unwrap_err();
        assert!(matches!(err, InsightsError::Transport(_)));
    }
}
