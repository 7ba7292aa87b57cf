//! Log command implementation

use crate::cli::LogLevelArg;
use crate::commands::import::build_client;
use crate::config::CtlConfig;
use crate::errors::CliError;
use crate::output::Outcome;

/// Handle the log command
pub async fn handle_log_command(level: LogLevelArg, message: String, config: &CtlConfig) -> Result<Outcome, CliError> {
    let client = build_client(config)?;

    match level {
        LogLevelArg::Alert => client.log_alert(message).await?,
        LogLevelArg::Info => client.log_info(message).await?,
    }

    Ok(Outcome::Logged {
        level,
        source_id: config.connection.source_id,
    })
}
