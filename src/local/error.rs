//! Error types for local repository discovery and diffing.

use thiserror::Error;

/// Errors raised while locating the local checkout.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocalDiscoveryError {
    /// The path is not within a Git repository.
    #[error("not inside a Git repository")]
    NotARepository,

    /// The repository has no remotes configured.
    #[error("repository has no remotes configured")]
    NoRemotes,

    /// The requested remote does not exist.
    #[error("remote '{name}' not found")]
    RemoteNotFound {
        /// Name of the missing remote.
        name: String,
    },

    /// The remote URL does not name an `owner/repository` pair.
    #[error("could not parse remote URL: {url}")]
    InvalidRemoteUrl {
        /// The rejected URL.
        url: String,
    },

    /// Any other libgit2 failure.
    #[error("git error: {message}")]
    Git {
        /// Message reported by libgit2.
        message: String,
    },
}

impl From<git2::Error> for LocalDiscoveryError {
    fn from(error: git2::Error) -> Self {
        Self::Git {
            message: error.message().to_owned(),
        }
    }
}

/// Errors raised while computing the change set of a pull request.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DiffError {
    /// The local checkout could not be opened.
    #[error("local repository is not available: {message}")]
    RepositoryNotAvailable {
        /// Detail from libgit2.
        message: String,
    },

    /// The snapshot does not carry the base or head revision.
    #[error("pull request snapshot has no {which} revision")]
    MissingRevision {
        /// `base` or `head`.
        which: &'static str,
    },

    /// A revision named by the snapshot is not present locally.
    #[error("commit {sha} not found locally; fetch the pull request first")]
    CommitNotFound {
        /// The missing commit.
        sha: String,
    },

    /// libgit2 failed while building the diff.
    #[error("failed to compute diff: {message}")]
    DiffComputationFailed {
        /// Detail from libgit2.
        message: String,
    },
}

impl From<git2::Error> for DiffError {
    fn from(error: git2::Error) -> Self {
        Self::DiffComputationFailed {
            message: error.message().to_owned(),
        }
    }
}
