//! Streaming JSON encoding of an import graph
//!
//! The document is produced as a sequence of text fragments: the structural
//! parts of the top-level object and one fragment per element. Concatenated,
//! the fragments are byte-for-byte what `serde_json::to_string` produces for the
//! equivalent [`GraphDocument`](crate::graph::GraphDocument).

use crate::errors::{InsightsError, InsightsResult};
use crate::graph::{Graph, Source};
use async_stream::try_stream;
use futures::{pin_mut, Stream, StreamExt};
use serde::Serialize;

const OPEN_ENTITIES: &str = r#"{"entities":["#;
const OPEN_RELATIONSHIPS: &str = r#"],"relationships":["#;
const OPEN_STREAM_ITEMS: &str = r#"],"streamItems":["#;
const CLOSE: &str = "]}";

/// Encode a graph as a lazy sequence of JSON fragments.
///
/// The graph is consumed, so the sequence can only be walked once. A source
/// failure ends the sequence with that failure; the document is left unclosed.
pub fn fragments<'a>(graph: Graph<'a>) -> impl Stream<Item = InsightsResult<String>> + Send + 'a {
    try_stream! {
        let Graph { entities, relationships, stream_items } = graph;

        yield OPEN_ENTITIES.to_string();
        let entities = elements(entities);
        pin_mut!(entities);
        while let Some(fragment) = entities.next().await {
            yield fragment?;
        }

        yield OPEN_RELATIONSHIPS.to_string();
        let relationships = elements(relationships);
        pin_mut!(relationships);
        while let Some(fragment) = relationships.next().await {
            yield fragment?;
        }

        yield OPEN_STREAM_ITEMS.to_string();
        let stream_items = elements(stream_items);
        pin_mut!(stream_items);
        while let Some(fragment) = stream_items.next().await {
            yield fragment?;
        }

        yield CLOSE.to_string();
    }
}

/// Encode the elements of one array, comma separated, as they arrive
fn elements<'a, T>(mut source: Source<'a, T>) -> impl Stream<Item = InsightsResult<String>> + Send + 'a
where
    T: Serialize + Send + 'a,
{
    try_stream! {
        let mut first = true;
        while let Some(item) = source.next().await {
            let item = item.map_err(InsightsError::Source)?;
            let encoded = serde_json::to_string(&item)?;

            let mut fragment = String::with_capacity(encoded.len() + 1);
            if !first {
                fragment.push(',');
            }
            fragment.push_str(&encoded);
            first = false;

            yield fragment;
        }
    }
}
