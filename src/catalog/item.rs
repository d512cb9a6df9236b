//! Repository entries shown by the catalog.

use crate::github::models::RepositoryRef;
use crate::local::canonical_repository_url;

/// A repository the viewer can pick.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryItem {
    /// Repository name without the owner.
    pub name: String,
    /// Clone URL as reported by the host.
    pub url: String,
    /// Display label, `owner/name`.
    pub caption: String,
}

impl RepositoryItem {
    /// Returns true when the caption contains `filter`, ignoring case.
    ///
    /// Blank filters match every item.
    #[must_use]
    pub fn matches(&self, filter: &str) -> bool {
        filter.trim().is_empty()
            || self
                .caption
                .to_lowercase()
                .contains(&filter.to_lowercase())
    }
}

impl From<RepositoryRef> for RepositoryItem {
    fn from(repository: RepositoryRef) -> Self {
        Self {
            caption: format!("{}/{}", repository.owner, repository.name),
            name: repository.name,
            url: repository.clone_url,
        }
    }
}

/// Repository derived from the selected [`RepositoryItem`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryModel {
    /// Repository name.
    pub name: String,
    /// Canonical `https://host/owner/name` URL.
    pub url: String,
}

impl From<&RepositoryItem> for RepositoryModel {
    fn from(item: &RepositoryItem) -> Self {
        Self {
            name: item.name.clone(),
            url: canonical_repository_url(&item.url),
        }
    }
}

/// Items of `all` matching `filter`, in their original order.
pub(crate) fn filter_items(all: &[RepositoryItem], filter: &str) -> Vec<RepositoryItem> {
    all.iter()
        .filter(|item| item.matches(filter))
        .cloned()
        .collect()
}
