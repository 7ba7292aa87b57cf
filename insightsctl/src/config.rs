//! Configuration management for insightsctl

use crate::cli::Cli;
use crate::errors::CliError;
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use insights_core::Config;
use serde::{Deserialize, Serialize};
use std::path::Path;

const TOKEN_VAR: &str = "INSIGHTS_SOURCE_TOKEN";

/// Configuration for insightsctl
#[derive(Debug, Clone, Deserialize)]
pub struct CtlConfig {
    /// Server location and source credentials
    #[serde(flatten)]
    pub connection: Config,
    /// Request timeout in milliseconds
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

/// Command-line values that take precedence over files and environment
#[derive(Debug, Default, Serialize)]
struct Overrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source_token: Option<String>,
}

impl From<&Cli> for Overrides {
    fn from(args: &Cli) -> Self {
        Self {
            base_url: args.base_url.clone(),
            source_id: args.source_id,
            source_token: args.source_token.clone(),
        }
    }
}

impl CtlConfig {
    /// Load configuration from file, environment and command line
    pub fn load(args: &Cli) -> Result<Self, CliError> {
        Self::figment(&args.config, Overrides::from(args))?
            .extract()
            .map_err(|e| CliError::Configuration(format!("Failed to parse configuration: {}", e)))
    }

    fn figment(config_path: &Option<std::path::PathBuf>, overrides: Overrides) -> Result<Figment, CliError> {
        let mut figment = Figment::new();

        // Load from default config file if it exists
        let default_config_paths = [
            "insights.yaml",
            "insights.yml",
            ".insights.yaml",
            ".insights.yml",
        ];

        for path in &default_config_paths {
            if Path::new(path).exists() {
                figment = figment.merge(Yaml::file(path));
                break;
            }
        }

        // Load from specified config file
        if let Some(path) = config_path {
            if path.exists() {
                figment = figment.merge(Yaml::file(path));
            } else {
                return Err(CliError::Configuration(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
        }

        // Environment variables prefixed with INSIGHTS_, then command-line flags.
        // The token is taken verbatim so digit-only tokens keep leading zeros.
        figment = figment.merge(Env::prefixed("INSIGHTS_"));
        if let Ok(token) = std::env::var(TOKEN_VAR) {
            figment = figment.merge(Serialized::default("source_token", token));
        }
        Ok(figment.merge(Serialized::defaults(overrides)))
    }
}
