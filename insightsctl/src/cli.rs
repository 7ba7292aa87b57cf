//! CLI argument definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "insightsctl")]
#[command(about = "Send imports and connector logs to an Insights server")]
#[command(version = "0.1.0")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Base URL of the Insights API
    #[arg(short, long, global = true)]
    pub base_url: Option<String>,

    /// Custom source identifier
    #[arg(short, long, global = true)]
    pub source_id: Option<u64>,

    /// Custom source token
    #[arg(short = 't', long, global = true)]
    pub source_token: Option<String>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long, global = true, value_enum, default_value = "table")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replace the source snapshot with the contents of a fixture
    Import {
        #[command(flatten)]
        input: InputArgs,
    },
    /// Write the compressed payload of a fixture to a file without uploading
    Encode {
        #[command(flatten)]
        input: InputArgs,
        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Send a connector log
    Log {
        /// Log level
        #[arg(value_enum)]
        level: LogLevelArg,
        /// Log message
        message: String,
    },
}

#[derive(clap::Args, Debug, Clone)]
pub struct InputArgs {
    /// JSON fixture with "entities", "relationships" and "streamItems"
    #[arg(short = 'F', long)]
    pub file: PathBuf,
    /// Extra stream items, one JSON object per line, read while uploading
    #[arg(long)]
    pub stream_items: Option<PathBuf>,
    /// Deflate compression level (0-9)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=9))]
    pub level: Option<u32>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevelArg {
    Alert,
    Info,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
}

impl std::fmt::Display for LogLevelArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevelArg::Alert => write!(f, "alert"),
            LogLevelArg::Info => write!(f, "info"),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
