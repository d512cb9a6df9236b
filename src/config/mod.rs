//! Application configuration loaded from CLI, environment, and files.
//!
//! Values are merged with ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.pendant.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PENDANT_TOKEN`, `PENDANT_PR_NUMBER`, ...,
//!    plus the legacy `GITHUB_TOKEN` fallback for the token
//! 4. **Command-line arguments** – `--token`/`-t`, `--pr-number`/`-p`, ...
//!
//! # Configuration File
//!
//! ```toml
//! token = "ghp_example"
//! host = "github.com"
//! owner = "octocat"
//! repo = "hello-world"
//! pr_number = 42
//! review_id = 0
//! repo_path = "."
//! telemetry = true
//! ```

use std::env;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::github::connection::Connection;
use crate::github::locator::{HostAddress, PersonalAccessToken};

/// Host used when none is configured.
pub const DEFAULT_HOST: &str = "github.com";

/// Errors raised while turning configuration into runnable inputs.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No token source provided a value.
    #[error("personal access token is required (use --token, PENDANT_TOKEN, or GITHUB_TOKEN)")]
    MissingToken,

    /// A required value is absent or malformed.
    #[error("configuration error: {message}")]
    Invalid {
        /// Which value is wrong and how to supply it.
        message: String,
    },
}

/// What the binary does with the loaded configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationMode {
    /// List and filter the repositories visible on the host.
    RepositoryCatalog,
    /// Open, and optionally submit, a review of one pull request.
    Review,
}

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use pendant::PendantConfig;
///
/// let config = PendantConfig::load().expect("failed to load configuration");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PENDANT",
    discovery(
        dotfile_name = ".pendant.toml",
        config_file_name = "pendant.toml",
        app_name = "pendant"
    )
)]
pub struct PendantConfig {
    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `PENDANT_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// GitHub host, `github.com` or an Enterprise host name or URL.
    #[ortho_config()]
    pub host: String,

    /// Repository owner; defaults to the owner of the checkout's `origin`.
    #[ortho_config(cli_short = 'o')]
    pub owner: Option<String>,

    /// Repository name; defaults to the name of the checkout's `origin`.
    #[ortho_config(cli_short = 'r')]
    pub repo: Option<String>,

    /// Pull request to review.
    #[ortho_config(cli_short = 'p')]
    pub pr_number: Option<u64>,

    /// Review to open; `0` starts a new pending review.
    #[ortho_config(cli_short = 'i')]
    pub review_id: u64,

    /// Path inside the local checkout the pull request is reviewed against.
    #[ortho_config()]
    pub repo_path: String,

    /// Submission event (`approve`, `request-changes`, `comment`).
    ///
    /// When set the pending review is submitted after it is shown.
    #[ortho_config(cli_short = 'e')]
    pub event: Option<String>,

    /// Body submitted with `event`.
    #[ortho_config(cli_short = 'b')]
    pub body: Option<String>,

    /// Lists repositories instead of opening a review.
    ///
    /// Booleans are not read from the environment by `ortho_config`; use the
    /// CLI flag `--list-repositories`/`-l` or the config file.
    #[ortho_config(cli_short = 'l')]
    pub list_repositories: bool,

    /// Caption filter applied to the repository list.
    #[ortho_config(cli_short = 'f')]
    pub filter: Option<String>,

    /// Writes telemetry events to stderr as JSON lines.
    #[ortho_config()]
    pub telemetry: bool,
}

impl Default for PendantConfig {
    fn default() -> Self {
        Self {
            token: None,
            host: DEFAULT_HOST.to_owned(),
            owner: None,
            repo: None,
            pr_number: None,
            review_id: 0,
            repo_path: ".".to_owned(),
            event: None,
            body: None,
            list_repositories: false,
            filter: None,
            telemetry: false,
        }
    }
}

impl PendantConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingToken`] when no source provides a
    /// non-blank value.
    pub fn resolve_token(&self) -> Result<PersonalAccessToken, ConfigError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .and_then(|raw| PersonalAccessToken::new(raw).ok())
            .ok_or(ConfigError::MissingToken)
    }

    /// Builds the connection for the configured host.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the host cannot be parsed.
    pub fn connection(&self) -> Result<Connection, ConfigError> {
        HostAddress::parse(&self.host)
            .map(Connection::new)
            .map_err(|error| ConfigError::Invalid {
                message: format!("host '{}' is invalid: {error}", self.host),
            })
    }

    /// Returns the pull request number or an error if missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when no number is configured.
    pub fn require_pr_number(&self) -> Result<u64, ConfigError> {
        self.pr_number.ok_or_else(|| ConfigError::Invalid {
            message: "pull request number is required (use --pr-number or -p)".to_owned(),
        })
    }

    /// Local checkout path.
    #[must_use]
    pub fn repo_path(&self) -> PathBuf {
        PathBuf::from(&self.repo_path)
    }

    /// Determines the operation mode.
    #[must_use]
    pub const fn operation_mode(&self) -> OperationMode {
        if self.list_repositories {
            OperationMode::RepositoryCatalog
        } else {
            OperationMode::Review
        }
    }
}

#[cfg(test)]
mod tests;
