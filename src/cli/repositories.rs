//! Repository catalog operation.

use std::io::{self, Write};
use std::sync::Arc;

use pendant::{
    Connection, ItemList, OctocrabRepositoryLister, PendantConfig, RepositoryCatalog,
    RepositoryLister,
};

use super::CliError;
use super::output::write_repositories;

/// Lists the repositories on the configured host, narrowed by the filter.
///
/// # Errors
///
/// Returns [`CliError::Config`] when the token or host is missing or
/// invalid, and [`CliError::Catalog`] when the listing fails.
pub async fn run(config: &PendantConfig) -> Result<(), CliError> {
    let token = config.resolve_token()?;
    let connection = config.connection()?;
    let lister = Arc::new(OctocrabRepositoryLister::new(token));

    let visible = list_repositories(lister, connection, config.filter.as_deref()).await?;

    let mut stdout = io::stdout().lock();
    write_repositories(&mut stdout, &visible, config.filter.as_deref())?;
    stdout.flush()?;
    Ok(())
}

/// Activates a catalog backed by `lister` and returns the visible items.
///
/// This function is exposed for testing with stub listers.
pub async fn list_repositories(
    lister: Arc<dyn RepositoryLister>,
    connection: Connection,
    filter: Option<&str>,
) -> Result<ItemList, CliError> {
    let catalog = RepositoryCatalog::new(lister);
    catalog.initialize(Some(connection))?;
    if let Some(text) = filter {
        catalog.set_filter(text);
    }

    catalog.activate().await;

    if let Some(error) = catalog.error() {
        return Err(error.into());
    }
    Ok(catalog.visible())
}
