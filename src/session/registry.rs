//! Manager that owns one session per pull request.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::debug;

use crate::github::gateway::ReviewGateway;
use crate::github::models::PullRequestSnapshot;
use crate::observable::lock;

use super::pull_request_session::PullRequestSession;
use super::{SessionError, SessionManager, SharedSession};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct SessionKey {
    owner: String,
    repo: String,
    number: u64,
}

impl SessionKey {
    fn for_snapshot(snapshot: &PullRequestSnapshot) -> Self {
        Self {
            owner: snapshot.owner().to_owned(),
            repo: snapshot.repo().to_owned(),
            number: snapshot.number(),
        }
    }
}

/// Keeps one [`PullRequestSession`] per `(owner, repo, number)`.
pub struct SessionRegistry {
    gateway: Arc<dyn ReviewGateway>,
    sessions: Mutex<HashMap<SessionKey, Arc<PullRequestSession>>>,
}

impl SessionRegistry {
    /// Creates an empty registry whose sessions talk to `gateway`.
    #[must_use]
    pub fn new(gateway: Arc<dyn ReviewGateway>) -> Self {
        Self {
            gateway,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Number of live sessions.
    #[must_use]
    pub fn len(&self) -> usize {
        lock(&self.sessions).len()
    }

    /// Returns true when no session has been created yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock(&self.sessions).is_empty()
    }
}

#[async_trait]
impl SessionManager for SessionRegistry {
    async fn get_session(
        &self,
        snapshot: Arc<PullRequestSnapshot>,
    ) -> Result<SharedSession, SessionError> {
        let key = SessionKey::for_snapshot(&snapshot);
        let mut sessions = lock(&self.sessions);

        if let Some(existing) = sessions.get(&key) {
            debug!(
                owner = %key.owner,
                repo = %key.repo,
                number = key.number,
                "reusing review session"
            );
            existing.update_snapshot(snapshot);
            return Ok(Arc::clone(existing) as SharedSession);
        }

        let session = Arc::new(PullRequestSession::new(Arc::clone(&self.gateway), snapshot));
        sessions.insert(key, Arc::clone(&session));
        let shared: SharedSession = session;
        Ok(shared)
    }
}
