//! Errors surfaced by the repository catalog.

use thiserror::Error;

use crate::github::error::RemoteError;

/// Failures of [`RepositoryCatalog`](super::RepositoryCatalog) operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CatalogError {
    /// `initialize` was called without a connection.
    #[error("a connection is required to list repositories")]
    MissingConnection,

    /// Listing repositories failed.
    #[error(transparent)]
    Remote(#[from] RemoteError),
}
