//! Tree diffs of pull requests computed with libgit2.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use git2::{Commit, Delta, DiffDelta, DiffFindOptions, Oid, Patch, Repository};
use tracing::debug;

use crate::changeset::{DiffService, FileChangeSet, FileDiff, FileStatus};
use crate::github::models::PullRequestSnapshot;

use super::discovery::LocalRepository;
use super::error::DiffError;

/// [`DiffService`] reading commits from the local checkout.
///
/// Both revisions of the pull request must already be fetched. The diff runs
/// from the merge base of base and head to head, so commits that landed on
/// the base branch after the pull request was opened are not shown.
#[derive(Debug, Clone, Copy, Default)]
pub struct Git2DiffService;

impl Git2DiffService {
    /// Creates the service.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DiffService for Git2DiffService {
    async fn tree_changes(
        &self,
        repository: &LocalRepository,
        snapshot: &PullRequestSnapshot,
    ) -> Result<FileChangeSet, DiffError> {
        let base = snapshot
            .base_sha
            .clone()
            .ok_or(DiffError::MissingRevision { which: "base" })?;
        let head = snapshot
            .head_sha
            .clone()
            .ok_or(DiffError::MissingRevision { which: "head" })?;
        let workdir: PathBuf = repository.workdir().to_path_buf();

        tokio::task::spawn_blocking(move || compute_tree_changes(&workdir, &base, &head))
            .await
            .map_err(|error| DiffError::DiffComputationFailed {
                message: error.to_string(),
            })?
    }
}

/// Computes the change set between the merge base of `base` and `head`, and
/// `head`, in the repository at `workdir`.
///
/// # Errors
///
/// Returns [`DiffError::RepositoryNotAvailable`] when `workdir` is not a
/// repository, [`DiffError::CommitNotFound`] when a revision is missing
/// locally, and [`DiffError::DiffComputationFailed`] for other libgit2
/// failures.
pub fn compute_tree_changes(
    workdir: &Path,
    base: &str,
    head: &str,
) -> Result<FileChangeSet, DiffError> {
    let repo = Repository::open(workdir).map_err(|error| DiffError::RepositoryNotAvailable {
        message: error.message().to_owned(),
    })?;
    let base_commit = find_commit(&repo, base)?;
    let head_commit = find_commit(&repo, head)?;
    let start = merge_base_or(&repo, &head_commit, base_commit);

    let mut diff =
        repo.diff_tree_to_tree(Some(&start.tree()?), Some(&head_commit.tree()?), None)?;
    let mut find = DiffFindOptions::new();
    find.renames(true);
    diff.find_similar(Some(&mut find))?;

    let mut files = Vec::with_capacity(diff.deltas().len());
    for (index, delta) in diff.deltas().enumerate() {
        let Some(status) = status_of(delta.status()) else {
            continue;
        };
        let (additions, deletions) = match Patch::from_diff(&diff, index)? {
            Some(patch) => {
                let (_context, added, removed) = patch.line_stats()?;
                (added, removed)
            }
            None => (0, 0),
        };
        let (path, old_path) = paths_of(&delta, status);
        files.push(FileDiff {
            path,
            old_path,
            status,
            additions,
            deletions,
        });
    }

    debug!(
        base = %start.id(),
        head = %head_commit.id(),
        files = files.len(),
        "computed pull request tree changes"
    );
    Ok(FileChangeSet::new(files))
}

fn find_commit<'repo>(repo: &'repo Repository, sha: &str) -> Result<Commit<'repo>, DiffError> {
    let not_found = || DiffError::CommitNotFound {
        sha: sha.to_owned(),
    };
    let oid = Oid::from_str(sha).map_err(|_| not_found())?;
    repo.find_commit(oid).map_err(|_| not_found())
}

fn merge_base_or<'repo>(
    repo: &'repo Repository,
    head: &Commit<'repo>,
    base: Commit<'repo>,
) -> Commit<'repo> {
    repo.merge_base(base.id(), head.id())
        .and_then(|oid| repo.find_commit(oid))
        .unwrap_or(base)
}

const fn status_of(delta: Delta) -> Option<FileStatus> {
    match delta {
        Delta::Added => Some(FileStatus::Added),
        Delta::Deleted => Some(FileStatus::Deleted),
        Delta::Modified => Some(FileStatus::Modified),
        Delta::Renamed => Some(FileStatus::Renamed),
        Delta::Copied => Some(FileStatus::Copied),
        Delta::Typechange => Some(FileStatus::TypeChanged),
        Delta::Unmodified
        | Delta::Ignored
        | Delta::Untracked
        | Delta::Unreadable
        | Delta::Conflicted => None,
    }
}

fn paths_of(delta: &DiffDelta<'_>, status: FileStatus) -> (String, Option<String>) {
    let display = |path: Option<&Path>| {
        path.map(|value| value.to_string_lossy().into_owned())
            .unwrap_or_default()
    };
    let old = display(delta.old_file().path());
    match status {
        FileStatus::Deleted => (old, None),
        FileStatus::Renamed | FileStatus::Copied => (display(delta.new_file().path()), Some(old)),
        FileStatus::Added | FileStatus::Modified | FileStatus::TypeChanged => {
            (display(delta.new_file().path()), None)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use git2::{Oid, Repository, Signature};
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    use super::{Git2DiffService, compute_tree_changes};
    use crate::changeset::{DiffService, FileStatus};
    use crate::local::{DiffError, GitHubOrigin, LocalRepository};
    use crate::test_support::SnapshotBuilder;

    struct Fixture {
        dir: TempDir,
        repo: Repository,
    }

    #[fixture]
    fn fixture() -> Fixture {
        let dir = TempDir::new().expect("temp dir");
        let repo = Repository::init(dir.path()).expect("init repository");
        Fixture { dir, repo }
    }

    /// Commits `changes` on top of `parent` without moving any reference.
    /// `None` content removes the file.
    fn commit(repo: &Repository, parent: Option<Oid>, changes: &[(&str, Option<&str>)]) -> Oid {
        let parent_commit = parent.map(|oid| repo.find_commit(oid).expect("parent commit"));
        let parent_tree = parent_commit
            .as_ref()
            .map(|found| found.tree().expect("parent tree"));
        let mut builder = repo.treebuilder(parent_tree.as_ref()).expect("tree builder");
        for (name, content) in changes {
            match content {
                Some(text) => {
                    let blob = repo.blob(text.as_bytes()).expect("blob");
                    builder.insert(*name, blob, 0o100_644).expect("insert");
                }
                None => builder.remove(*name).expect("remove"),
            }
        }
        let tree = repo.find_tree(builder.write().expect("write tree")).expect("tree");
        let signature = Signature::now("Test", "test@example.com").expect("signature");
        let parents: Vec<_> = parent_commit.iter().collect();
        repo.commit(None, &signature, &signature, "commit", &tree, &parents)
            .expect("commit")
    }

    fn local(path: &Path) -> LocalRepository {
        let origin = GitHubOrigin::parse("git@github.com:octo/repo.git").expect("origin");
        LocalRepository::new(path.to_path_buf(), origin)
    }

    #[rstest]
    fn reports_status_and_line_counts_per_file(fixture: Fixture) {
        let base = commit(
            &fixture.repo,
            None,
            &[("a.txt", Some("one\ntwo\n")), ("c.txt", Some("gone\n"))],
        );
        let head = commit(
            &fixture.repo,
            Some(base),
            &[
                ("a.txt", Some("one\nthree\nfour\n")),
                ("b.txt", Some("brand new file\n")),
                ("c.txt", None),
            ],
        );

        let changes = compute_tree_changes(fixture.dir.path(), &base.to_string(), &head.to_string())
            .expect("diff should succeed");

        let summary: Vec<_> = changes
            .files()
            .iter()
            .map(|file| (file.path.as_str(), file.status, file.additions, file.deletions))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("a.txt", FileStatus::Modified, 2, 1),
                ("b.txt", FileStatus::Added, 1, 0),
                ("c.txt", FileStatus::Deleted, 0, 1),
            ]
        );
        assert_eq!(changes.totals(), (3, 2));
    }

    #[rstest]
    fn diffs_from_the_merge_base(fixture: Fixture) {
        let fork = commit(&fixture.repo, None, &[("a.txt", Some("a\n"))]);
        let head = commit(&fixture.repo, Some(fork), &[("feature.txt", Some("f\n"))]);
        let base = commit(&fixture.repo, Some(fork), &[("upstream.txt", Some("u\n"))]);

        let changes = compute_tree_changes(fixture.dir.path(), &base.to_string(), &head.to_string())
            .expect("diff should succeed");

        let paths: Vec<_> = changes.files().iter().map(|file| file.path.as_str()).collect();
        assert_eq!(paths, vec!["feature.txt"]);
    }

    #[rstest]
    fn detects_renames(fixture: Fixture) {
        let content = "line one\nline two\nline three\nline four\n";
        let base = commit(&fixture.repo, None, &[("old.rs", Some(content))]);
        let head = commit(
            &fixture.repo,
            Some(base),
            &[("old.rs", None), ("new.rs", Some(content))],
        );

        let changes = compute_tree_changes(fixture.dir.path(), &base.to_string(), &head.to_string())
            .expect("diff should succeed");

        let file = changes.files().first().expect("one change");
        assert_eq!(changes.len(), 1);
        assert_eq!(file.status, FileStatus::Renamed);
        assert_eq!(file.path, "new.rs");
        assert_eq!(file.old_path.as_deref(), Some("old.rs"));
    }

    #[rstest]
    fn missing_commit_is_reported(fixture: Fixture) {
        let base = commit(&fixture.repo, None, &[("a.txt", Some("a\n"))]);
        let missing = "0123456789abcdef0123456789abcdef01234567";

        let error = compute_tree_changes(fixture.dir.path(), &base.to_string(), missing)
            .expect_err("diff should fail");

        assert_eq!(
            error,
            DiffError::CommitNotFound {
                sha: missing.to_owned()
            }
        );
    }

    #[rstest]
    fn non_repository_is_unavailable() {
        let dir = TempDir::new().expect("temp dir");

        let error = compute_tree_changes(dir.path(), "a", "b").expect_err("diff should fail");

        assert!(matches!(error, DiffError::RepositoryNotAvailable { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn service_requires_both_revisions(fixture: Fixture) {
        let snapshot = SnapshotBuilder::new("octo", "repo", 1).build();

        let error = Git2DiffService::new()
            .tree_changes(&local(fixture.dir.path()), &snapshot)
            .await
            .expect_err("diff should fail");

        assert_eq!(error, DiffError::MissingRevision { which: "base" });
    }

    #[rstest]
    #[tokio::test]
    async fn service_diffs_snapshot_revisions(fixture: Fixture) {
        let base = commit(&fixture.repo, None, &[("a.txt", Some("a\n"))]);
        let head = commit(&fixture.repo, Some(base), &[("a.txt", Some("b\n"))]);
        let snapshot = SnapshotBuilder::new("octo", "repo", 1)
            .revisions(&base.to_string(), &head.to_string())
            .build();

        let changes = Git2DiffService::new()
            .tree_changes(&local(fixture.dir.path()), &snapshot)
            .await
            .expect("diff should succeed");

        assert_eq!(changes.len(), 1);
    }
}
