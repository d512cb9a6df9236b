//! Repository catalog for picking the repository to review.
//!
//! [`RepositoryCatalog`] lists the repositories visible on a connection once,
//! then narrows them with a case-insensitive caption filter. Selecting an item
//! derives a [`RepositoryModel`] with a canonical URL.

mod error;
mod item;
mod repository_catalog;

pub use error::CatalogError;
pub use item::{RepositoryItem, RepositoryModel};
pub use repository_catalog::{ItemList, RepositoryCatalog};
