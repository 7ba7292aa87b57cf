//! Import encoding pipeline: graph -> JSON fragments -> deflate chunks -> payload

use crate::compressor::compress_with;
use crate::errors::{InsightsError, InsightsResult};
use crate::graph::Graph;
use crate::serializer::fragments;
use bytes::{Bytes, BytesMut};
use flate2::Compression;
use futures::{pin_mut, StreamExt};
use std::time::{Duration, Instant};
use tracing::debug;

/// Pipeline stages, in pull order from the consumer's side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    Serialize,
    Compress,
    Upload,
}

impl std::fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineStage::Serialize => write!(f, "serialize"),
            PipelineStage::Compress => write!(f, "compress"),
            PipelineStage::Upload => write!(f, "upload"),
        }
    }
}

impl PipelineStage {
    /// Stage a failure originated from
    pub fn of_error(err: &InsightsError) -> Self {
        match err {
            InsightsError::Source(_) | InsightsError::Serialization(_) => PipelineStage::Serialize,
            InsightsError::Compression(_) => PipelineStage::Compress,
            InsightsError::Transport(_) => PipelineStage::Upload,
        }
    }
}

/// Figures about one encoded import
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EncodeStats {
    /// Number of JSON fragments produced by the serializer
    pub fragments: usize,
    /// Size of the JSON document, which is never held in memory as a whole
    pub uncompressed_bytes: usize,
    /// Size of the payload
    pub compressed_bytes: usize,
    /// Number of chunks the compressor produced
    pub chunks: usize,
    pub elapsed: Duration,
}

/// Compressed import payload, ready for the transport
#[derive(Debug, Clone)]
pub struct EncodedPayload {
    pub payload: Bytes,
    pub stats: EncodeStats,
}

/// Encode a graph with the default compression level
pub async fn encode(graph: Graph<'_>) -> InsightsResult<EncodedPayload> {
    encode_with(graph, Compression::default()).await
}

/// Encode a graph into one compressed payload.
///
/// Only compressed output accumulates; each JSON fragment is dropped once the
/// compressor has consumed it. Fails with the first error of any stage.
pub async fn encode_with(graph: Graph<'_>, level: Compression) -> InsightsResult<EncodedPayload> {
    let start_time = Instant::now();
    let mut stats = EncodeStats::default();
    let mut payload = BytesMut::new();
    let mut chunk_count = 0;

    {
        let counted = fragments(graph).inspect(|fragment| {
            if let Ok(fragment) = fragment {
                stats.fragments += 1;
                stats.uncompressed_bytes += fragment.len();
            }
        });
        let chunks = compress_with(counted, level);
        pin_mut!(chunks);

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            payload.extend_from_slice(&chunk);
            chunk_count += 1;
        }
    }

    stats.chunks = chunk_count;
    stats.compressed_bytes = payload.len();
    stats.elapsed = start_time.elapsed();

    debug!(
        "Encoded import: {} fragments, {} bytes of JSON compressed to {} bytes in {:?}",
        stats.fragments, stats.uncompressed_bytes, stats.compressed_bytes, stats.elapsed
    );

    Ok(EncodedPayload {
        payload: payload.freeze(),
        stats,
    })
}
