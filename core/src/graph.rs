//! Graph assembly: the three import sources under one structure
//!
//! A [`Graph`] does not look at its elements. It only groups the entity,
//! relationship and stream-item sources so the serializer can pull from them in
//! a fixed order. Nothing is polled until the serializer asks for it.

use crate::errors::BoxError;
use crate::types::{Entity, Relationship, StreamItem};
use futures::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// Single-pass sequence of import elements
///
/// Elements may be available up front or arrive over time. A failed element
/// carries the caller's error unchanged.
pub struct Source<'a, T> {
    inner: BoxStream<'a, Result<T, BoxError>>,
}

impl<'a, T: Send + 'a> Source<'a, T> {
    /// Source over an eagerly available collection
    pub fn iter<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: Send + 'a,
    {
        Self {
            inner: stream::iter(items.into_iter().map(Ok)).boxed(),
        }
    }

    /// Source over an asynchronous stream that cannot fail
    pub fn from_stream<S>(items: S) -> Self
    where
        S: Stream<Item = T> + Send + 'a,
    {
        Self {
            inner: items.map(Ok).boxed(),
        }
    }

    /// Source over an asynchronous stream whose elements may fail
    pub fn from_try_stream<S, E>(items: S) -> Self
    where
        S: Stream<Item = Result<T, E>> + Send + 'a,
        E: Into<BoxError> + 'a,
    {
        Self {
            inner: items.map_err(Into::<BoxError>::into).boxed(),
        }
    }

    /// Source fed by a producer task through a channel.
    ///
    /// The sequence ends once every sender is dropped.
    pub fn from_receiver(receiver: mpsc::Receiver<T>) -> Self {
        let items = stream::unfold(receiver, |mut receiver| async move {
            receiver.recv().await.map(|item| (item, receiver))
        });
        Self::from_stream(items)
    }

    /// Source without elements
    pub fn empty() -> Self {
        Self {
            inner: stream::empty().boxed(),
        }
    }
}

impl<'a, T: Send + 'a> From<Vec<T>> for Source<'a, T> {
    fn from(items: Vec<T>) -> Self {
        Self::iter(items)
    }
}

impl<'a, T> Stream for Source<'a, T> {
    type Item = Result<T, BoxError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().inner.poll_next_unpin(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> std::fmt::Debug for Source<'a, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Source").finish_non_exhaustive()
    }
}

/// The current snapshot plus incremental changes of one import
#[derive(Debug)]
pub struct Graph<'a> {
    pub entities: Source<'a, Entity>,
    pub relationships: Source<'a, Relationship>,
    pub stream_items: Source<'a, StreamItem>,
}

impl<'a> Graph<'a> {
    /// Group the three sources of an import
    pub fn new(
        entities: impl Into<Source<'a, Entity>>,
        relationships: impl Into<Source<'a, Relationship>>,
        stream_items: impl Into<Source<'a, StreamItem>>,
    ) -> Self {
        Self {
            entities: entities.into(),
            relationships: relationships.into(),
            stream_items: stream_items.into(),
        }
    }

    /// Graph without any elements
    pub fn empty() -> Self {
        Self::new(Source::empty(), Source::empty(), Source::empty())
    }

    /// Replace the stream-item source
    pub fn with_stream_items(mut self, stream_items: impl Into<Source<'a, StreamItem>>) -> Self {
        self.stream_items = stream_items.into();
        self
    }
}

/// Fully materialized import, as found in fixture files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphDocument {
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub stream_items: Vec<StreamItem>,
}

impl<'a> From<GraphDocument> for Graph<'a> {
    fn from(document: GraphDocument) -> Self {
        Graph::new(document.entities, document.relationships, document.stream_items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct ReadFailed;

    impl std::fmt::Display for ReadFailed {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "read failed")
        }
    }

    impl std::error::Error for ReadFailed {}

    #[tokio::test]
    async fn test_iter_source_preserves_order() {
        let source = Source::iter(vec![1, 2, 3]);
        let items: Vec<i32> = source.try_collect().await.unwrap();
        assert_eq!(items, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_try_stream_source_keeps_error() {
        let items = stream::iter(vec![Ok(1), Err(ReadFailed), Ok(3)]);
        let mut source = Source::from_try_stream(items);

        assert_eq!(source.next().await.unwrap().unwrap(), 1);
        let err = source.next().await.unwrap().unwrap_err();
        assert!(err.downcast_ref::<ReadFailed>().is_some());
    }

    #[tokio::test]
    async fn test_try_stream_source_over_borrowed_items() {
        let names = vec!["a".to_string(), String::new(), "c".to_string()];
        let items = stream::iter(names.iter()).map(|name| {
            if name.is_empty() {
                Err(format!("empty name after {}", names[0]))
            } else {
                Ok(name.as_str())
            }
        });

        let collected: Vec<Result<&str, BoxError>> = Source::from_try_stream(items).collect().await;
        assert_eq!(collected.len(), 3);
        assert_eq!(collected[0].as_ref().ok(), Some(&"a"));
        assert_eq!(collected[1].as_ref().unwrap_err().to_string(), "empty name after a");
        assert_eq!(collected[2].as_ref().ok(), Some(&"c"));
    }

    #[tokio::test]
    async fn test_receiver_source_ends_when_senders_drop() {
        let (tx, rx) = mpsc::channel(2);
        let producer = tokio::spawn(async move {
            for i in 0..5 {
                tx.send(i).await.unwrap();
            }
        });

        let items: Vec<i32> = Source::from_receiver(rx).try_collect().await.unwrap();
        producer.await.unwrap();
        assert_eq!(items, vec![0, 1, 2, 3, 4]);
    }

    #[tokio::test]
    async fn test_graph_from_document() {
        let document: GraphDocument = serde_json::from_value(json!({
            "entities": [{"id": "u1", "name": "Alice", "type": "user", "attributeAssignments": []}]
        }))
        .unwrap();
        assert!(document.relationships.is_empty());
        assert!(document.stream_items.is_empty());

        let graph = Graph::from(document);
        let entities: Vec<Entity> = graph.entities.try_collect().await.unwrap();
        assert_eq!(entities, vec![Entity::new("u1", "Alice", "user")]);
    }

    #[tokio::test]
    async fn test_empty_graph() {
        let graph = Graph::empty();
        assert_eq!(graph.entities.count().await, 0);
        assert_eq!(graph.relationships.count().await, 0);
        assert_eq!(graph.stream_items.count().await, 0);
    }
}
