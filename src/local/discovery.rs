//! Discovery of the local checkout behind a review.

use std::path::{Path, PathBuf};

use git2::Repository;

use super::error::LocalDiscoveryError;
use super::remote::GitHubOrigin;

const DEFAULT_REMOTE_NAME: &str = "origin";

/// A local working tree and the GitHub origin it tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalRepository {
    workdir: PathBuf,
    origin: GitHubOrigin,
}

impl LocalRepository {
    /// Pairs a working tree with an already parsed origin.
    #[must_use]
    pub const fn new(workdir: PathBuf, origin: GitHubOrigin) -> Self {
        Self { workdir, origin }
    }

    /// Path to the working tree.
    #[must_use]
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }

    /// Parsed origin remote.
    #[must_use]
    pub const fn origin(&self) -> &GitHubOrigin {
        &self.origin
    }

    /// Owner of the origin repository.
    #[must_use]
    pub fn owner(&self) -> &str {
        self.origin.owner()
    }

    /// Name of the origin repository; reviews must target the same name.
    #[must_use]
    pub fn repository(&self) -> &str {
        self.origin.repository()
    }
}

/// Finds the repository enclosing `start_path` and parses its `origin`.
///
/// # Errors
///
/// Returns [`LocalDiscoveryError::NotARepository`] outside a work tree,
/// [`LocalDiscoveryError::NoRemotes`] or
/// [`LocalDiscoveryError::RemoteNotFound`] when `origin` is missing, and
/// [`LocalDiscoveryError::InvalidRemoteUrl`] when it cannot be parsed.
pub fn discover_repository(start_path: &Path) -> Result<LocalRepository, LocalDiscoveryError> {
    discover_repository_with_remote(start_path, DEFAULT_REMOTE_NAME)
}

/// Like [`discover_repository`], reading `remote_name` instead of `origin`.
///
/// # Errors
///
/// Same as [`discover_repository`].
pub fn discover_repository_with_remote(
    start_path: &Path,
    remote_name: &str,
) -> Result<LocalRepository, LocalDiscoveryError> {
    let repo = Repository::discover(start_path).map_err(|error| {
        if error.code() == git2::ErrorCode::NotFound {
            LocalDiscoveryError::NotARepository
        } else {
            LocalDiscoveryError::from(error)
        }
    })?;
    let workdir = repo
        .workdir()
        .map(Path::to_path_buf)
        .ok_or(LocalDiscoveryError::NotARepository)?;

    if repo.remotes()?.is_empty() {
        return Err(LocalDiscoveryError::NoRemotes);
    }
    let remote = repo.find_remote(remote_name).map_err(|error| {
        if error.code() == git2::ErrorCode::NotFound {
            LocalDiscoveryError::RemoteNotFound {
                name: remote_name.to_owned(),
            }
        } else {
            LocalDiscoveryError::from(error)
        }
    })?;
    let url = remote
        .url()
        .ok_or_else(|| LocalDiscoveryError::InvalidRemoteUrl {
            url: "(no URL)".to_owned(),
        })?;

    Ok(LocalRepository::new(workdir, GitHubOrigin::parse(url)?))
}
