//! Connection to a GitHub installation.

use std::fmt;

use super::locator::HostAddress;

/// Identifies the remote host a catalog or review controller talks to.
///
/// Connections are owned by the hosting shell and handed to controllers by
/// value; they never change once created.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Connection {
    host: HostAddress,
}

impl Connection {
    /// Creates a connection for the given host.
    #[must_use]
    pub const fn new(host: HostAddress) -> Self {
        Self { host }
    }

    /// Host address used for listing and diagnostics.
    #[must_use]
    pub const fn host_address(&self) -> &HostAddress {
        &self.host
    }
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.host)
    }
}
