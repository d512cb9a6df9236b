//! Catalog controller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::github::connection::Connection;
use crate::github::gateway::RepositoryLister;
use crate::observable::{ActivityFlag, Observable, lock};

use super::error::CatalogError;
use super::item::{RepositoryItem, RepositoryModel, filter_items};

/// Shared, immutable list of repository items.
pub type ItemList = Arc<Vec<RepositoryItem>>;

/// Lists the repositories of one connection and filters them for display.
///
/// The listing is fetched at most once per successful [`activate`]; a failed
/// fetch may be retried.
///
/// [`activate`]: Self::activate
pub struct RepositoryCatalog {
    lister: Arc<dyn RepositoryLister>,
    connection: Mutex<Option<Connection>>,
    started: AtomicBool,
    enabled: Observable<bool>,
    loading: ActivityFlag,
    error: Observable<Option<CatalogError>>,
    items: Observable<Option<ItemList>>,
    filter_text: Observable<String>,
    visible: Observable<ItemList>,
    selected: Observable<Option<RepositoryItem>>,
    repository: Observable<Option<RepositoryModel>>,
}

impl RepositoryCatalog {
    /// Creates a disabled catalog backed by `lister`.
    #[must_use]
    pub fn new(lister: Arc<dyn RepositoryLister>) -> Self {
        Self {
            lister,
            connection: Mutex::new(None),
            started: AtomicBool::new(false),
            enabled: Observable::new(false),
            loading: ActivityFlag::new(),
            error: Observable::default(),
            items: Observable::default(),
            filter_text: Observable::default(),
            visible: Observable::default(),
            selected: Observable::default(),
            repository: Observable::default(),
        }
    }

    /// Binds the catalog to `connection` and enables it.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingConnection`] when `connection` is
    /// `None`; the catalog stays disabled.
    pub fn initialize(&self, connection: Option<Connection>) -> Result<(), CatalogError> {
        let bound = connection.ok_or(CatalogError::MissingConnection)?;
        debug!(host = %bound, "repository catalog bound");
        *lock(&self.connection) = Some(bound);
        self.enabled.set(true);
        Ok(())
    }

    /// Fetches the repository list on first use.
    ///
    /// Does nothing before [`initialize`](Self::initialize) or once a fetch
    /// has started. Failures are published on [`error`](Self::error) and
    /// leave the collection unset.
    pub async fn activate(&self) {
        let Some(connection) = lock(&self.connection).clone() else {
            debug!("repository catalog activated before initialize");
            return;
        };
        if self
            .started
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        let _loading = self.loading.begin();
        self.error.set(None);
        let host = connection.host_address();

        match self.lister.list_repositories(host).await {
            Ok(repositories) => {
                let items: Vec<RepositoryItem> =
                    repositories.into_iter().map(RepositoryItem::from).collect();
                info!(host = %host, count = items.len(), "repositories listed");
                self.items.set(Some(Arc::new(items)));
                self.refilter();
            }
            Err(remote) => {
                error!(host = %host, error = %remote, "failed to list repositories");
                self.started.store(false, Ordering::SeqCst);
                self.error.set(Some(CatalogError::Remote(remote)));
            }
        }
    }

    /// Replaces the filter text and recomputes the visible items.
    pub fn set_filter(&self, text: impl Into<String>) {
        self.filter_text.set(text.into());
        self.refilter();
    }

    /// Selects `item`, or clears the selection, and derives the
    /// repository model from it.
    pub fn select(&self, item: Option<RepositoryItem>) {
        let model = item.as_ref().map(RepositoryModel::from);
        self.selected.set(item);
        self.repository.set(model);
    }

    fn refilter(&self) {
        let filter = self.filter_text.get();
        let visible = self.items.with(|items| {
            items
                .as_ref()
                .map_or_else(Vec::new, |all| filter_items(all, &filter))
        });
        self.visible.set(Arc::new(visible));
    }

    /// True once a connection is bound.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled.get()
    }

    /// True while the repository list is being fetched.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading.is_active()
    }

    /// Subscribes to the loading flag.
    #[must_use]
    pub fn subscribe_loading(&self) -> watch::Receiver<bool> {
        self.loading.subscribe()
    }

    /// Error of the latest fetch.
    #[must_use]
    pub fn error(&self) -> Option<CatalogError> {
        self.error.get()
    }

    /// Every listed repository, `None` until a fetch succeeds.
    #[must_use]
    pub fn items(&self) -> Option<ItemList> {
        self.items.get()
    }

    /// Current filter text.
    #[must_use]
    pub fn filter_text(&self) -> String {
        self.filter_text.get()
    }

    /// Listed repositories matching the filter, in listing order.
    #[must_use]
    pub fn visible(&self) -> ItemList {
        self.visible.get()
    }

    /// Subscribes to the visible items.
    #[must_use]
    pub fn subscribe_visible(&self) -> watch::Receiver<ItemList> {
        self.visible.subscribe()
    }

    /// Selected item.
    #[must_use]
    pub fn selected(&self) -> Option<RepositoryItem> {
        self.selected.get()
    }

    /// Model derived from the selected item.
    #[must_use]
    pub fn repository(&self) -> Option<RepositoryModel> {
        self.repository.get()
    }

    /// Subscribes to the derived model.
    #[must_use]
    pub fn subscribe_repository(&self) -> watch::Receiver<Option<RepositoryModel>> {
        self.repository.subscribe()
    }
}
