//! Octocrab client construction helpers for gateway implementations.

use http::Uri;
use octocrab::Octocrab;

use crate::github::error::RemoteError;
use crate::github::locator::{HostAddress, PersonalAccessToken};

use super::error_mapping::map_octocrab_error;

/// Builds an Octocrab client for the given token and host.
///
/// # Errors
///
/// Returns `RemoteError::InvalidUrl` when the API base cannot be parsed as a
/// URI or `RemoteError::Api` when Octocrab fails to construct a client.
pub(super) fn build_octocrab_client(
    token: &PersonalAccessToken,
    host: &HostAddress,
) -> Result<Octocrab, RemoteError> {
    let base_uri: Uri = host
        .api_base()
        .as_str()
        .parse::<Uri>()
        .map_err(|error| RemoteError::InvalidUrl(error.to_string()))?;

    Octocrab::builder()
        .personal_token(token.as_ref())
        .base_uri(base_uri)
        .map_err(|error| RemoteError::Api {
            message: format!("build client failed: {error}"),
        })?
        .build()
        .map_err(|error| map_octocrab_error("build client", &error))
}
