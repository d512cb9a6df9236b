//! Pendant CLI entrypoint for repository listing and pull request reviews.

mod cli;

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use pendant::{OperationMode, PendantConfig};

use cli::CliError;

#[tokio::main]
async fn main() -> ExitCode {
    cli::logging::init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), CliError> {
    let config = load_config()?;

    match config.operation_mode() {
        OperationMode::RepositoryCatalog => cli::repositories::run(&config).await,
        OperationMode::Review => cli::review::run(&config).await,
    }
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`CliError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<PendantConfig, CliError> {
    PendantConfig::load().map_err(|error| CliError::Configuration {
        message: error.to_string(),
    })
}
