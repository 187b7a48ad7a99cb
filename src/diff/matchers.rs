//! Line classifiers for diff change lines.
//!
//! Each matcher is a pure function that either recognises a line as one
//! structural change and builds the record, or returns `None`. The parser
//! runs them in [`MATCHERS`] order and keeps the first hit, so a line that
//! looks like several things resolves to the earliest kind in the table.

use std::collections::VecDeque;
use std::sync::LazyLock;

use regex_lite::Regex;

use super::{ChangeKind, ChangeRecord, Direction, Snippet};

static ACCESS_METHOD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(public|private|protected)\s+.*\w+\s*\([^)]*\)").unwrap());
static BARE_METHOD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+\s*\([^)]*\)").unwrap());
static METHOD_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(\w+)\s*\(").unwrap());
static RETURN_TYPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(public|private|protected)?\s*(static)?\s*([\w<>\[\]]+)\s+\w+\s*\(").unwrap()
});
static ANNOTATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@(\w+)").unwrap());
static CLASS_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(class|interface|enum)\s+(\w+)").unwrap());
static ACCESS_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(private|public|protected)\s+\w+\s+\w+.*;").unwrap());
static INITIALIZED_FIELD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+\s+\w+\s*=.*;").unwrap());
static FIELD_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(private|public|protected)?\s*\w+\s+(\w+)\s*[=;]").unwrap()
});

/// Surrounding lines available to a matcher.
pub(crate) struct LineContext<'a> {
    pub file: &'a str,
    /// Up to five raw diff lines before the change line.
    pub before: &'a [&'a str],
    /// Up to five raw diff lines after the change line.
    pub after: &'a [&'a str],
    /// Most recent unchanged lines of the current file, oldest first.
    pub recent: &'a VecDeque<&'a str>,
}

impl LineContext<'_> {
    fn window(&self) -> impl Iterator<Item = &str> {
        self.before.iter().chain(self.after.iter()).copied()
    }
}

pub(crate) type Matcher = fn(&str, Direction, &LineContext<'_>) -> Option<ChangeRecord>;

pub(crate) const MATCHERS: [Matcher; 6] = [
    match_method,
    match_annotation,
    match_class,
    match_import,
    match_configuration,
    match_field,
];

/// Run the matchers in priority order and return the first record built.
pub(crate) fn classify(
    line: &str,
    direction: Direction,
    ctx: &LineContext<'_>,
) -> Option<ChangeRecord> {
    MATCHERS
        .iter()
        .find_map(|matcher| matcher(line, direction, ctx))
}

fn match_method(line: &str, direction: Direction, ctx: &LineContext<'_>) -> Option<ChangeRecord> {
    if !is_method_signature(line) {
        return None;
    }

    let name = method_name(line);
    let annotations = context_annotations(ctx);
    let kind = match direction {
        Direction::Added => ChangeKind::MethodAdded,
        Direction::Removed => ChangeKind::MethodRemoved,
    };

    Some(ChangeRecord::new(
        kind,
        name.clone(),
        ctx.file,
        method_details(line, &name, &annotations),
        Snippet::new(direction, line),
    ))
}

fn match_annotation(
    line: &str,
    direction: Direction,
    ctx: &LineContext<'_>,
) -> Option<ChangeRecord> {
    if !line.trim().starts_with('@') {
        return None;
    }

    let annotation = annotation_name(line);
    let target = annotation_target(ctx);

    let (kind, label, detail) = match direction {
        Direction::Added => (
            ChangeKind::AnnotationAdded,
            format!("{annotation} on {target}"),
            format!("Added {annotation} to {target}"),
        ),
        Direction::Removed => (
            ChangeKind::AnnotationRemoved,
            format!("{annotation} from {target}"),
            format!("Removed {annotation} from {target}"),
        ),
    };

    Some(ChangeRecord::new(
        kind,
        label,
        ctx.file,
        vec![detail],
        Snippet::new(direction, line),
    ))
}

fn match_class(line: &str, direction: Direction, ctx: &LineContext<'_>) -> Option<ChangeRecord> {
    let keyword = ["class ", "interface ", "enum "]
        .into_iter()
        .find(|k| line.contains(k))?
        .trim_end();

    let (keyword, name) = match CLASS_HEADER.captures(line) {
        Some(caps) => (caps[1].to_string(), caps[2].to_string()),
        None => (keyword.to_string(), "unknown".to_string()),
    };

    let (kind, verb) = match direction {
        Direction::Added => (ChangeKind::ClassAdded, "Added"),
        Direction::Removed => (ChangeKind::ClassRemoved, "Removed"),
    };

    Some(ChangeRecord::new(
        kind,
        name.clone(),
        ctx.file,
        vec![format!("{verb} {keyword} {name}")],
        Snippet::new(direction, line),
    ))
}

fn match_import(line: &str, direction: Direction, ctx: &LineContext<'_>) -> Option<ChangeRecord> {
    let rest = line.trim().strip_prefix("import ")?;
    let path = rest.replace(';', "").trim().to_string();

    let (kind, verb) = match direction {
        Direction::Added => (ChangeKind::ImportAdded, "Added"),
        Direction::Removed => (ChangeKind::ImportRemoved, "Removed"),
    };

    Some(ChangeRecord::new(
        kind,
        path.clone(),
        ctx.file,
        vec![format!("{verb} import: {path}")],
        Snippet::new(direction, line),
    ))
}

fn match_configuration(
    line: &str,
    direction: Direction,
    ctx: &LineContext<'_>,
) -> Option<ChangeRecord> {
    if direction != Direction::Added {
        return None;
    }
    let is_bean = line.contains("@Bean") || (line.contains("return") && line.contains("Provider"));
    if !is_bean {
        return None;
    }

    let bean_type = bean_type(line);

    Some(ChangeRecord::new(
        ChangeKind::ConfigurationAdded,
        format!("{bean_type} Bean"),
        ctx.file,
        vec![format!("Added Bean configuration for {bean_type}")],
        Snippet::new(direction, line),
    ))
}

fn match_field(line: &str, direction: Direction, ctx: &LineContext<'_>) -> Option<ChangeRecord> {
    if direction != Direction::Removed || !is_field_declaration(line) {
        return None;
    }

    let name = field_name(line);

    Some(ChangeRecord::new(
        ChangeKind::FieldRemoved,
        name.clone(),
        ctx.file,
        vec![format!("Removed field: {name}")],
        Snippet::new(direction, line),
    ))
}

pub(crate) fn is_method_signature(line: &str) -> bool {
    ACCESS_METHOD.is_match(line) || BARE_METHOD.is_match(line)
}

/// The last identifier directly followed by `(`; earlier ones are usually
/// return types or modifiers.
pub(crate) fn method_name(line: &str) -> String {
    METHOD_NAME
        .captures_iter(line)
        .last()
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Capitalized, non-`void` type token right before the method name.
pub(crate) fn return_type(line: &str) -> Option<String> {
    let caps = RETURN_TYPE.captures(line.trim())?;
    let ty = caps.get(3)?.as_str();
    let capitalized = ty.chars().next().is_some_and(|c| c.is_ascii_uppercase());
    (capitalized && ty != "void").then(|| ty.to_string())
}

/// Parameter types, or `none` for an empty list.
pub(crate) fn parameter_types(line: &str) -> Option<String> {
    let start = line.find('(')?;
    let end = line.rfind(')')?;
    if start >= end {
        return None;
    }

    let params = line[start + 1..end].trim();
    if params.is_empty() {
        return Some("none".to_string());
    }

    let types: Vec<&str> = params
        .split(',')
        .filter_map(|param| param.split_whitespace().next())
        .collect();
    Some(types.join(", "))
}

fn access_modifier(line: &str) -> Option<&'static str> {
    ["public", "private", "protected"]
        .into_iter()
        .find(|modifier| line.contains(modifier))
}

fn method_details(line: &str, name: &str, annotations: &[String]) -> Vec<String> {
    let mut details = vec![format!("name: {name}")];

    if let Some(access) = access_modifier(line) {
        details.push(format!("access: {access}"));
    }
    if let Some(ty) = return_type(line) {
        details.push(format!("returns: {ty}"));
    }
    if let Some(params) = parameter_types(line) {
        details.push(format!("params: {params}"));
    }
    if !annotations.is_empty() {
        details.push(format!("annotations: {}", annotations.join(", ")));
    }

    details
}

fn annotation_name(line: &str) -> String {
    ANNOTATION
        .captures(line)
        .map(|caps| format!("@{}", &caps[1]))
        .unwrap_or_else(|| line.trim().to_string())
}

/// Strip the leading `+`, `-` or space marker from a raw diff line.
fn code_of(raw: &str) -> &str {
    match raw.as_bytes().first() {
        Some(b'+' | b'-' | b' ') => &raw[1..],
        _ => raw,
    }
}

fn context_annotations(ctx: &LineContext<'_>) -> Vec<String> {
    ctx.window()
        .filter(|raw| !raw.starts_with("@@"))
        .map(|raw| code_of(raw).trim())
        .filter(|code| code.starts_with('@'))
        .map(annotation_name)
        .collect()
}

/// Describe the method or class an annotation line applies to.
///
/// The forward scan ends at the next file header; `recent` only ever holds
/// lines of the current file.
fn annotation_target(ctx: &LineContext<'_>) -> String {
    ctx.after
        .iter()
        .take_while(|raw| !raw.starts_with("diff --git"))
        .chain(ctx.recent.iter().rev())
        .find_map(|raw| describe_declaration(raw))
        .unwrap_or_else(|| "unknown".to_string())
}

fn describe_declaration(raw: &str) -> Option<String> {
    if is_method_signature(raw) {
        return Some(format!("method {}", method_name(raw)));
    }
    if raw.contains("class ") {
        let name = CLASS_HEADER
            .captures(raw)
            .map(|caps| caps[2].to_string())
            .unwrap_or_else(|| "unknown".to_string());
        return Some(format!("class {name}"));
    }
    None
}

fn bean_type(line: &str) -> String {
    if line.contains("ToolCallbackProvider") {
        return "ToolCallbackProvider".to_string();
    }
    if line.contains("Provider") {
        return "Provider".to_string();
    }
    return_type(line).unwrap_or_else(|| "Bean".to_string())
}

fn is_field_declaration(line: &str) -> bool {
    let trimmed = line.trim();
    ACCESS_FIELD.is_match(trimmed) || INITIALIZED_FIELD.is_match(trimmed)
}

pub(crate) fn field_name(line: &str) -> String {
    let trimmed = line.trim();
    if let Some(caps) = FIELD_NAME.captures(trimmed) {
        return caps[2].to_string();
    }

    let parts: Vec<&str> = trimmed.split_whitespace().collect();
    parts
        .windows(2)
        .filter(|pair| pair[1].contains(';') || pair[1].contains('='))
        .map(|pair| pair[1].split(['=', ';']).next().unwrap_or(""))
        .find(|name| !name.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "unknown".to_string())
}
