//! Import command implementation

use crate::cli::InputArgs;
use crate::config::CtlConfig;
use crate::errors::CliError;
use crate::fixture::load_graph;
use crate::output::Outcome;
use insights_connector_http::{connect_with, HttpConfig};
use insights_core::InsightsClient;
use tracing::info;

/// Handle the import command
pub async fn handle_import_command(input: InputArgs, config: &CtlConfig) -> Result<Outcome, CliError> {
    let client = build_client(config)?.with_compression(super::compression(&input));
    let graph = load_graph(&input).await?;

    info!(
        "Importing {} into source {} at {}",
        input.file.display(),
        config.connection.source_id,
        config.connection.base_url
    );
    client.perform_import(graph).await?;

    Ok(Outcome::Imported {
        source_id: config.connection.source_id,
    })
}

/// Build an HTTP-backed client from the loaded configuration
pub(crate) fn build_client(config: &CtlConfig) -> Result<InsightsClient, CliError> {
    let mut http = HttpConfig::from(&config.connection);
    if let Some(timeout_ms) = config.timeout_ms {
        http = http.with_timeout(timeout_ms);
    }
    Ok(connect_with(&config.connection, http)?)
}
