//! The local checkout behind a review.
//!
//! [`discover_repository`] finds the working tree and its GitHub origin, and
//! [`Git2DiffService`] computes pull request change sets from the commits
//! already present in it.
//!
//! ```no_run
//! use std::path::Path;
//! use pendant::local::discover_repository;
//!
//! match discover_repository(Path::new(".")) {
//!     Ok(local) => println!("{}/{}", local.owner(), local.repository()),
//!     Err(error) => eprintln!("discovery failed: {error}"),
//! }
//! ```

mod diff;
mod discovery;
mod error;
mod remote;

pub use diff::{Git2DiffService, compute_tree_changes};
pub use discovery::{LocalRepository, discover_repository, discover_repository_with_remote};
pub use error::{DiffError, LocalDiscoveryError};
pub use remote::{GitHubOrigin, canonical_repository_url};
