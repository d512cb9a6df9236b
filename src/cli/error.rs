//! Errors reported by the command-line shell.

use std::io;

use pendant::{CatalogError, ConfigError, LocalDiscoveryError, RemoteError, ReviewError};
use thiserror::Error;

/// Anything that ends a CLI run with a non-zero exit code.
#[derive(Debug, Error)]
pub enum CliError {
    /// Arguments, environment, or configuration files could not be loaded.
    #[error("configuration error: {message}")]
    Configuration {
        /// Loader error message.
        message: String,
    },

    /// Loaded configuration is incomplete or invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The local checkout could not be discovered.
    #[error("local repository discovery failed: {0}")]
    Discovery(#[from] LocalDiscoveryError),

    /// A GitHub client could not be built.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Listing repositories failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Opening or submitting the review failed.
    #[error(transparent)]
    Review(#[from] ReviewError),

    /// Writing to the terminal failed.
    #[error("failed to write output: {message}")]
    Io {
        /// I/O error message.
        message: String,
    },
}

impl From<io::Error> for CliError {
    fn from(error: io::Error) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}
