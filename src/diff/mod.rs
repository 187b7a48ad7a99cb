//! Unified diff parsing into typed structural change records.

mod matchers;
pub mod parser;

use std::fmt;

use serde::Serialize;

pub use parser::parse_diff;

/// File name used when no `diff --git` header has been seen.
pub const UNKNOWN_FILE: &str = "unknown";

/// Kind of structural edit detected on a single diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    MethodAdded,
    MethodRemoved,
    MethodModified,
    ClassAdded,
    ClassRemoved,
    ClassModified,
    AnnotationAdded,
    AnnotationRemoved,
    ImportAdded,
    ImportRemoved,
    FieldAdded,
    FieldRemoved,
    ConfigurationAdded,
    ConfigurationModified,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::MethodAdded => "method_added",
            ChangeKind::MethodRemoved => "method_removed",
            ChangeKind::MethodModified => "method_modified",
            ChangeKind::ClassAdded => "class_added",
            ChangeKind::ClassRemoved => "class_removed",
            ChangeKind::ClassModified => "class_modified",
            ChangeKind::AnnotationAdded => "annotation_added",
            ChangeKind::AnnotationRemoved => "annotation_removed",
            ChangeKind::ImportAdded => "import_added",
            ChangeKind::ImportRemoved => "import_removed",
            ChangeKind::FieldAdded => "field_added",
            ChangeKind::FieldRemoved => "field_removed",
            ChangeKind::ConfigurationAdded => "configuration_added",
            ChangeKind::ConfigurationModified => "configuration_modified",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which side of the diff a change line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Added,
    Removed,
}

/// The raw source line a record was built from.
///
/// A record always stems from exactly one `+` or `-` line, so it carries
/// exactly one snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "side", content = "line", rename_all = "snake_case")]
pub enum Snippet {
    Removed(String),
    Added(String),
}

impl Snippet {
    pub fn new(direction: Direction, line: &str) -> Self {
        match direction {
            Direction::Added => Snippet::Added(line.to_string()),
            Direction::Removed => Snippet::Removed(line.to_string()),
        }
    }
}

/// One detected structural edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeRecord {
    kind: ChangeKind,
    target: String,
    file: String,
    details: Vec<String>,
    snippet: Snippet,
}

impl ChangeRecord {
    pub fn new(
        kind: ChangeKind,
        target: impl Into<String>,
        file: impl Into<String>,
        details: Vec<String>,
        snippet: Snippet,
    ) -> Self {
        Self {
            kind,
            target: target.into(),
            file: file.into(),
            details,
            snippet,
        }
    }

    pub fn kind(&self) -> ChangeKind {
        self.kind
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn details(&self) -> &[String] {
        &self.details
    }

    /// The removed source line, for records built from a `-` line.
    pub fn before(&self) -> Option<&str> {
        match &self.snippet {
            Snippet::Removed(line) => Some(line),
            Snippet::Added(_) => None,
        }
    }

    /// The added source line, for records built from a `+` line.
    pub fn after(&self) -> Option<&str> {
        match &self.snippet {
            Snippet::Added(line) => Some(line),
            Snippet::Removed(_) => None,
        }
    }
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} in {}", self.kind, self.target, self.file)
    }
}
