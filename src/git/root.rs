//! Repository root discovery.

use std::path::{Path, PathBuf};

use git2::Repository;
use tracing::debug;

/// Walk upward from `start` to the nearest repository and return its work
/// tree. Bare repositories have no work tree and yield `None`.
pub fn find_work_tree(start: &Path) -> Option<PathBuf> {
    let repo = Repository::discover(start).ok()?;
    repo.workdir().map(Path::to_path_buf)
}

/// Resolve the directory git commands run in.
///
/// The first candidate inside a repository wins. When none is, the first
/// candidate is used as is; `None` only for an empty candidate list.
pub fn resolve_root(candidates: &[PathBuf]) -> Option<PathBuf> {
    for candidate in candidates {
        if let Some(root) = find_work_tree(candidate) {
            debug!("Resolved repository root {} from {}", root.display(), candidate.display());
            return Some(root);
        }
    }
    candidates.first().cloned()
}
