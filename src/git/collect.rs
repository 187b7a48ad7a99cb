//! Diff and changed-file collection, and committing a chosen message.

use std::io::Write;

use tracing::{debug, warn};

use crate::error::{CommandError, CommitError};

use super::CommandRunner;

// color.ui=always would prefix every line with an escape sequence
const STAGED_DIFF: &[&str] = &["diff", "--no-color", "--cached"];
const WORKING_DIFF: &[&str] = &["diff", "--no-color"];
const STAGED_NAMES: &[&str] = &["diff", "--name-only", "--cached"];
const WORKING_NAMES: &[&str] = &["diff", "--name-only"];

/// Order in which the two diff sources are tried.
fn sources<'a>(staged_first: bool, staged: &'a [&'a str], working: &'a [&'a str]) -> [&'a [&'a str]; 2] {
    if staged_first {
        [staged, working]
    } else {
        [working, staged]
    }
}

async fn first_non_blank(
    runner: &dyn CommandRunner,
    order: [&[&str]; 2],
) -> Result<String, CommandError> {
    let [primary, secondary] = order;
    let output = runner.run_capture(primary).await?;
    if !output.trim().is_empty() {
        return Ok(output);
    }
    runner.run_capture(secondary).await
}

/// Collect the pending diff, preferring staged changes when `staged_first`.
///
/// Falls back to the other source when the preferred one is blank. Any git
/// failure is logged and reported as an empty diff.
pub async fn collect_diff(runner: &dyn CommandRunner, staged_first: bool) -> String {
    match first_non_blank(runner, sources(staged_first, STAGED_DIFF, WORKING_DIFF)).await {
        Ok(diff) => {
            debug!("Collected diff of {} bytes", diff.len());
            diff
        }
        Err(e) => {
            warn!("Failed to collect diff: {}", e);
            String::new()
        }
    }
}

/// Collect the changed file paths with the same source policy as
/// [`collect_diff`].
pub async fn collect_changed_files(runner: &dyn CommandRunner, staged_first: bool) -> Vec<String> {
    match first_non_blank(runner, sources(staged_first, STAGED_NAMES, WORKING_NAMES)).await {
        Ok(names) => names
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect(),
        Err(e) => {
            warn!("Failed to collect changed files: {}", e);
            Vec::new()
        }
    }
}

/// Commit the staged changes with `message` via `git commit -F`.
///
/// The message goes through a temporary file that is removed afterwards.
pub async fn commit_with_message(
    runner: &dyn CommandRunner,
    message: &str,
) -> Result<(), CommitError> {
    if message.trim().is_empty() {
        return Err(CommitError::EmptyMessage);
    }

    let mut file = tempfile::Builder::new()
        .prefix("commitsmith-msg-")
        .suffix(".txt")
        .tempfile()
        .map_err(CommitError::TempFile)?;
    file.write_all(message.as_bytes())
        .and_then(|_| file.flush())
        .map_err(CommitError::TempFile)?;

    let path = file.path().to_string_lossy().into_owned();
    let code = runner.run(&["commit", "-F", path.as_str()]).await?;

    if code != 0 {
        return Err(CommitError::GitFailed(code));
    }
    Ok(())
}
