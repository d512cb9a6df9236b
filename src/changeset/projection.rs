//! Per-file view of a change set with its relevant comment threads.

use std::fmt;
use std::sync::Arc;

use tokio::sync::watch;

use crate::session::{InlineCommentThread, ReviewSession, ThreadSet};

use super::model::{FileChangeSet, FileDiff};

/// Predicate selecting the comment threads shown next to each file.
pub type CommentFilter = Arc<dyn Fn(&InlineCommentThread) -> bool + Send + Sync>;

/// One changed file and the threads that survive the comment filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileView {
    /// Diff summary of the file.
    pub diff: FileDiff,
    /// Threads anchored to the file.
    pub threads: Vec<InlineCommentThread>,
}

struct Binding {
    changeset: Arc<FileChangeSet>,
    filter: CommentFilter,
    threads: watch::Receiver<ThreadSet>,
}

/// Projects a [`FileChangeSet`] and a session's threads into [`FileView`]s.
///
/// Each [`initialize`](Self::initialize) replaces the previous change set and
/// thread subscription, so reloading never accumulates receivers on the
/// session.
#[derive(Default)]
pub struct FileChangeSetProjection {
    binding: Option<Binding>,
}

impl FileChangeSetProjection {
    /// Creates an empty projection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the projection to `session`, taking ownership of `changeset`.
    pub fn initialize(
        &mut self,
        session: &dyn ReviewSession,
        changeset: FileChangeSet,
        filter: CommentFilter,
    ) {
        self.binding = Some(Binding {
            changeset: Arc::new(changeset),
            filter,
            threads: session.subscribe_threads(),
        });
    }

    /// Returns true between `initialize` and `dispose`.
    #[must_use]
    pub const fn is_initialized(&self) -> bool {
        self.binding.is_some()
    }

    /// The bound change set.
    #[must_use]
    pub fn changeset(&self) -> Option<Arc<FileChangeSet>> {
        self.binding
            .as_ref()
            .map(|binding| Arc::clone(&binding.changeset))
    }

    /// Builds the per-file view from the session's current threads.
    #[must_use]
    pub fn files(&self) -> Vec<FileView> {
        let Some(binding) = self.binding.as_ref() else {
            return Vec::new();
        };
        let threads = Arc::clone(&binding.threads.borrow());

        binding
            .changeset
            .files()
            .iter()
            .map(|diff| FileView {
                diff: diff.clone(),
                threads: threads
                    .iter()
                    .filter(|thread| thread.path == diff.path && (binding.filter)(thread))
                    .cloned()
                    .collect(),
            })
            .collect()
    }

    /// Drops the change set and the thread subscription.
    pub fn dispose(&mut self) {
        self.binding = None;
    }
}

impl fmt::Debug for FileChangeSetProjection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileChangeSetProjection")
            .field(
                "files",
                &self.binding.as_ref().map(|binding| binding.changeset.len()),
            )
            .finish_non_exhaustive()
    }
}
