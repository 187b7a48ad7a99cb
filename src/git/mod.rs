//! Git collaborators: process runner, diff collection, root discovery.

pub mod collect;
#[cfg(test)]
pub(crate) mod fake;
pub mod root;
pub mod runner;

pub use collect::{collect_changed_files, collect_diff, commit_with_message};
pub use root::{find_work_tree, resolve_root};
pub use runner::{CommandRunner, GitCli};
