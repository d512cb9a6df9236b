//! File-level change set of a pull request.

use std::fmt;

/// How a file changed between the base and head of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileStatus {
    /// New file.
    Added,
    /// Removed file.
    Deleted,
    /// Content changed in place.
    Modified,
    /// Moved, possibly with edits.
    Renamed,
    /// Copied from another path.
    Copied,
    /// Mode or type change only.
    TypeChanged,
}

impl FileStatus {
    /// Single-letter code as printed by `git diff --name-status`.
    #[must_use]
    pub const fn code(self) -> char {
        match self {
            Self::Added => 'A',
            Self::Deleted => 'D',
            Self::Modified => 'M',
            Self::Renamed => 'R',
            Self::Copied => 'C',
            Self::TypeChanged => 'T',
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Diff summary for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    /// Path at the head revision (the old path for deletions).
    pub path: String,
    /// Previous path for renames and copies.
    pub old_path: Option<String>,
    /// Kind of change.
    pub status: FileStatus,
    /// Added lines.
    pub additions: usize,
    /// Removed lines.
    pub deletions: usize,
}

/// Ordered, immutable list of per-file diffs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileChangeSet {
    files: Vec<FileDiff>,
}

impl FileChangeSet {
    /// Wraps diffs in the order they should be shown.
    #[must_use]
    pub const fn new(files: Vec<FileDiff>) -> Self {
        Self { files }
    }

    /// Diffs in display order.
    #[must_use]
    pub fn files(&self) -> &[FileDiff] {
        &self.files
    }

    /// Number of changed files.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true when nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Total added and removed lines.
    #[must_use]
    pub fn totals(&self) -> (usize, usize) {
        self.files.iter().fold((0, 0), |(added, removed), file| {
            (
                added.saturating_add(file.additions),
                removed.saturating_add(file.deletions),
            )
        })
    }
}

impl FromIterator<FileDiff> for FileChangeSet {
    fn from_iter<I: IntoIterator<Item = FileDiff>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
