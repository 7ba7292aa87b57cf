//! # Insights Core
//!
//! Types and the streaming import pipeline of the Insights client. An import
//! graph is serialized to JSON fragment by fragment, compressed as the fragments
//! arrive and handed to a [`Transport`] as a single payload.

pub mod types;
pub mod traits;
pub mod errors;
pub mod config;
pub mod graph;
pub mod serializer;
pub mod compressor;
pub mod pipeline;
pub mod client;

// Re-export commonly used types and traits
pub use types::{AttributeAssignment, Entity, Relationship, SourceId, StreamItem, Value};
pub use traits::{Clock, SystemClock, Transport};
pub use errors::{BoxError, InsightsError, TransportError};
pub use config::Config;
pub use graph::{Graph, GraphDocument, Source};
pub use client::InsightsClient;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::types::*;
    pub use crate::traits::*;
    pub use crate::errors::*;
    pub use crate::config::Config;
    pub use crate::graph::*;
    pub use crate::pipeline::{encode, encode_with, EncodeStats, EncodedPayload, PipelineStage};
    pub use crate::client::InsightsClient;
    pub use async_trait::async_trait;
    pub use bytes::Bytes;
    pub use flate2::Compression;
}
