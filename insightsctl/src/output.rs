//! Output formatting utilities for insightsctl

use crate::cli::{LogLevelArg, OutputFormat};
use colored::*;
use insights_core::pipeline::EncodeStats;
use insights_core::SourceId;
use serde_json::json;
use std::path::PathBuf;

/// Result of a successful command
#[derive(Debug)]
pub enum Outcome {
    Imported { source_id: SourceId },
    Encoded { output: PathBuf, stats: EncodeStats },
    Logged { level: LogLevelArg, source_id: SourceId },
}

/// Print the outcome of a command in the requested format
pub fn display_outcome(outcome: &Outcome, format: OutputFormat) {
    match format {
        OutputFormat::Table => display_table(outcome),
        OutputFormat::Json => println!("{}", outcome_json(outcome)),
    }
}

fn display_table(outcome: &Outcome) {
    match outcome {
        Outcome::Imported { source_id } => {
            println!("{}", format!("✓ Snapshot of source {} replaced", source_id).green().bold());
        }
        Outcome::Logged { level, source_id } => {
            println!("{}", format!("✓ Sent {} log to source {}", level, source_id).green().bold());
        }
        Outcome::Encoded { output, stats } => {
            println!("{}", "Payload written".bold().blue());
            println!("{:<15} {}", "File:".bold(), output.display());
            println!("{:<15} {}", "Fragments:".bold(), stats.fragments);
            println!("{:<15} {} bytes", "JSON:".bold(), stats.uncompressed_bytes);
            println!("{:<15} {} bytes", "Compressed:".bold(), stats.compressed_bytes);
            println!("{:<15} {}", "Ratio:".bold(), format_ratio(stats));
            println!("{:<15} {:?}", "Elapsed:".bold(), stats.elapsed);
        }
    }
}

fn outcome_json(outcome: &Outcome) -> serde_json::Value {
    match outcome {
        Outcome::Imported { source_id } => json!({
            "status": "imported",
            "sourceId": source_id.get(),
        }),
        Outcome::Logged { level, source_id } => json!({
            "status": "logged",
            "level": level.to_string(),
            "sourceId": source_id.get(),
        }),
        Outcome::Encoded { output, stats } => json!({
            "status": "encoded",
            "file": output.display().to_string(),
            "fragments": stats.fragments,
            "uncompressedBytes": stats.uncompressed_bytes,
            "compressedBytes": stats.compressed_bytes,
            "chunks": stats.chunks,
            "elapsedMs": stats.elapsed.as_millis() as u64,
        }),
    }
}

fn format_ratio(stats: &EncodeStats) -> String {
    if stats.uncompressed_bytes == 0 {
        return "-".to_string();
    }
    let ratio = stats.compressed_bytes as f64 / stats.uncompressed_bytes as f64;
    format!("{:.1}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn stats() -> EncodeStats {
        EncodeStats {
            fragments: 9,
            uncompressed_bytes: 1000,
            compressed_bytes: 250,
            chunks: 2,
            elapsed: Duration::from_millis(12),
        }
    }

    #[test]
    fn test_format_ratio() {
        assert_eq!(format_ratio(&stats()), "25.0%");
        assert_eq!(format_ratio(&EncodeStats::default()), "-");
    }

    #[test]
    fn test_encoded_json() {
        let outcome = Outcome::Encoded {
            output: PathBuf::from("out.bin"),
            stats: stats(),
        };
        let value = outcome_json(&outcome);
        assert_eq!(value["file"], "out.bin");
        assert_eq!(value["compressedBytes"], 250);
        assert_eq!(value["elapsedMs"], 12);
    }

    #[test]
    fn test_logged_json() {
        let outcome = Outcome::Logged {
            level: LogLevelArg::Alert,
            source_id: SourceId::new(4),
        };
        assert_eq!(
            outcome_json(&outcome),
            json!({"status": "logged", "level": "alert", "sourceId": 4})
        );
    }
}
