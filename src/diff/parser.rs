//! Line-by-line scan of unified diff text.

use std::collections::VecDeque;

use tracing::debug;

use super::matchers::{LineContext, classify};
use super::{ChangeRecord, Direction, UNKNOWN_FILE};

/// Number of raw lines on each side of a change line handed to matchers.
pub const CONTEXT_RADIUS: usize = 5;

/// Maximum number of unchanged lines remembered for the current file.
pub const CONTEXT_BUFFER_CAP: usize = 10;

/// Parse unified diff text into structural change records.
///
/// Never fails: lines that match no pattern are skipped, and text that is not
/// a diff at all simply yields an empty list. Records come out in the order
/// their source lines appear.
pub fn parse_diff(diff: &str) -> Vec<ChangeRecord> {
    let lines: Vec<&str> = diff.lines().collect();
    let mut records = Vec::new();
    let mut current_file: String = UNKNOWN_FILE.to_string();
    let mut recent: VecDeque<&str> = VecDeque::with_capacity(CONTEXT_BUFFER_CAP + 1);

    for (idx, raw) in lines.iter().copied().enumerate() {
        if raw.starts_with("diff --git") {
            current_file = file_from_header(raw);
            recent.clear();
            continue;
        }

        let direction = if raw.starts_with('+') && !raw.starts_with("+++") {
            Some(Direction::Added)
        } else if raw.starts_with('-') && !raw.starts_with("---") {
            Some(Direction::Removed)
        } else {
            None
        };

        match direction {
            Some(direction) => {
                let code = raw[1..].trim();
                let ctx = LineContext {
                    file: &current_file,
                    before: &lines[idx.saturating_sub(CONTEXT_RADIUS)..idx],
                    after: &lines[idx + 1..(idx + 1 + CONTEXT_RADIUS).min(lines.len())],
                    recent: &recent,
                };
                if let Some(record) = classify(code, direction, &ctx) {
                    records.push(record);
                }
            }
            None if !raw.starts_with('+') && !raw.starts_with('-') && !raw.starts_with('@') => {
                recent.push_back(raw);
                if recent.len() > CONTEXT_BUFFER_CAP {
                    recent.pop_front();
                }
            }
            None => {}
        }
    }

    debug!("Parsed {} change records from {} diff lines", records.len(), lines.len());
    records
}

/// Extract the post-image path from a `diff --git a/x b/x` header.
fn file_from_header(line: &str) -> String {
    line.split(' ')
        .nth(3)
        .map(|path| path.strip_prefix("b/").unwrap_or(path).to_string())
        .unwrap_or_else(|| UNKNOWN_FILE.to_string())
}
