//! Error type for insightsctl commands

use insights_core::errors::{InsightsError, TransportError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Insights(#[from] InsightsError),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Failed to read fixture {path}: {message}")]
    Fixture { path: PathBuf, message: String },

    #[error("Failed to write {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<TransportError> for CliError {
    fn from(err: TransportError) -> Self {
        CliError::Insights(err.into())
    }
}
