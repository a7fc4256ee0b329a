// sensum-publish: sensum_db release publisher
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git query operations using gix.

use std::path::Path;

use crate::error::{GitError, GixError, Result};

fn discover(path: &Path) -> Result<gix::Repository> {
    if !path.exists() {
        return Err(GitError::RepoNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    let repo = gix::discover(path).map_err(|e| GitError::Gix(GixError::Discover(Box::new(e))))?;
    Ok(repo)
}

#[must_use]
pub fn is_git_repo(path: &Path) -> bool {
    gix::discover(path).is_ok()
}

/// Get current branch name (None if HEAD is detached).
///
/// # Errors
///
/// Returns a `GitError` if repository discovery or head resolution fails.
pub fn current_branch(path: &Path) -> Result<Option<String>> {
    let repo = discover(path)?;
    let head = repo
        .head_name()
        .map_err(|e| GitError::Gix(GixError::Head(e)))?;
    Ok(head.map(|name| name.shorten().to_string()))
}

/// Check for uncommitted changes (staged, unstaged, or untracked files).
///
/// # Errors
///
/// Returns a `GitError` if the path does not exist, repository discovery
/// fails, or the status check fails.
pub fn has_uncommitted_changes(path: &Path) -> Result<bool> {
    use gix::status::UntrackedFiles;

    let repo = discover(path)?;

    let has_changes = repo
        .status(gix::progress::Discard)
        .map_err(|e| GitError::Gix(GixError::Status(e.to_string())))?
        .untracked_files(UntrackedFiles::Files)
        .into_iter(None)
        .map_err(|e| GitError::Gix(GixError::Status(e.to_string())))?
        .next()
        .is_some();

    Ok(has_changes)
}
