//! Reading import graphs from fixture files

use crate::cli::InputArgs;
use crate::errors::CliError;
use async_stream::try_stream;
use futures::stream::{self, Stream, StreamExt};
use insights_core::prelude::*;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

/// Load the graph described by the input arguments.
///
/// The JSON fixture is read up front; the optional JSON Lines file is only read
/// while the graph is being encoded, after the fixture's own stream items.
pub async fn load_graph(input: &InputArgs) -> Result<Graph<'static>, CliError> {
    let document = load_document(&input.file).await?;
    debug!(
        "Loaded {}: {} entities, {} relationships, {} stream items",
        input.file.display(),
        document.entities.len(),
        document.relationships.len(),
        document.stream_items.len()
    );

    let GraphDocument {
        entities,
        relationships,
        stream_items,
    } = document;

    let stream_items = match &input.stream_items {
        Some(path) => {
            let fixture_items = stream::iter(stream_items.into_iter().map(Ok::<_, BoxError>));
            Source::from_try_stream(fixture_items.chain(stream_items_from_lines(path.clone())))
        }
        None => Source::from(stream_items),
    };

    Ok(Graph::new(entities, relationships, stream_items))
}

/// Read and parse a JSON fixture
pub async fn load_document(path: &Path) -> Result<GraphDocument, CliError> {
    let contents = tokio::fs::read(path).await.map_err(|e| CliError::Fixture {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    serde_json::from_slice(&contents).map_err(|e| CliError::Fixture {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Stream items from a JSON Lines file, parsed one line at a time. Blank lines are skipped.
pub fn stream_items_from_lines(path: PathBuf) -> impl Stream<Item = Result<StreamItem, BoxError>> + Send + 'static {
    try_stream! {
        let file = File::open(&path).await.map_err(|e| line_error(&path, 0, e))?;
        let mut lines = BufReader::new(file).lines();
        let mut line_number = 0;

        while let Some(line) = lines
            .next_line()
            .await
            .map_err(|e| line_error(&path, line_number + 1, e))?
        {
            line_number += 1;
            if line.trim().is_empty() {
                continue;
            }

            let item: StreamItem = serde_json::from_str(&line).map_err(|e| line_error(&path, line_number, e))?;
            yield item;
        }
    }
}

fn line_error(path: &Path, line_number: usize, err: impl std::fmt::Display) -> BoxError {
    format!("{}:{}: {}", path.display(), line_number, err).into()
}
