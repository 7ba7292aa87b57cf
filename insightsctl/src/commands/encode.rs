//! Encode command implementation

use crate::cli::InputArgs;
use crate::errors::CliError;
use crate::fixture::load_graph;
use crate::output::Outcome;
use insights_core::pipeline::{encode_with, EncodeStats};
use std::path::{Path, PathBuf};
use tracing::info;

/// Handle the encode command
pub async fn handle_encode_command(input: InputArgs, output: PathBuf) -> Result<Outcome, CliError> {
    let stats = encode_to_file(&input, &output).await?;
    Ok(Outcome::Encoded { output, stats })
}

/// Encode the input graph and write the payload to a file
async fn encode_to_file(input: &InputArgs, output_path: &Path) -> Result<EncodeStats, CliError> {
    let graph = load_graph(input).await?;
    let encoded = encode_with(graph, super::compression(input)).await?;

    tokio::fs::write(output_path, &encoded.payload)
        .await
        .map_err(|e| CliError::Output {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    info!("Wrote {} bytes to {}", encoded.payload.len(), output_path.display());
    Ok(encoded.stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use std::io::{Read, Write};
    use tempfile::{tempdir, NamedTempFile};

    #[tokio::test]
    async fn test_encode_writes_complete_payload() {
        let mut fixture = NamedTempFile::new().unwrap();
        write!(
            fixture,
            r#"{{"entities":[{{"id":"u1","name":"Alice","type":"user","attributeAssignments":[]}}]}}"#
        )
        .unwrap();
        let dir = tempdir().unwrap();
        let output_path = dir.path().join("payload.bin");

        let input = InputArgs {
            file: fixture.path().to_path_buf(),
            stream_items: None,
            level: Some(9),
        };
        let stats = encode_to_file(&input, &output_path).await.unwrap();

        let payload = std::fs::read(&output_path).unwrap();
        assert_eq!(payload.len(), stats.compressed_bytes);

        let mut decoder = ZlibDecoder::new(payload.as_slice());
        let mut document = String::new();
        decoder.read_to_string(&mut document).unwrap();
        assert_eq!(
            document,
            r#"{"entities":[{"id":"u1","name":"Alice","type":"user","attributeAssignments":[]}],"relationships":[],"streamItems":[]}"#
        );
    }

    #[tokio::test]
    async fn test_failed_stream_items_leave_no_file() {
        let mut fixture = NamedTempFile::new().unwrap();
        write!(fixture, "{{}}").unwrap();
        let mut lines = NamedTempFile::new().unwrap();
        writeln!(lines, "not json").unwrap();
        let dir = tempdir().unwrap();
        let output_path = dir.path().join("payload.bin");

        let input = InputArgs {
            file: fixture.path().to_path_buf(),
            stream_items: Some(lines.path().to_path_buf()),
            level: None,
        };
        let err = encode_to_file(&input, &output_path).await.unwrap_err();

        assert!(matches!(err, CliError::Insights(ref e) if e.is_source()));
        assert!(!output_path.exists());
    }
}
