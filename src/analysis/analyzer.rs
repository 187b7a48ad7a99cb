//! Aggregation of change records into an [`AnalysisSummary`].

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex_lite::Regex;
use tracing::debug;

use crate::diff::{ChangeKind, ChangeRecord};

use super::{
    AnalysisMetadata, AnalysisSummary, ChangePattern, Intent, MAX_COMPLEXITY, MAX_KEY_CHANGES,
    Scope,
};

static CAPITALIZED_WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b[A-Z]\w+").unwrap());

/// Substrings that add a keyword whenever they appear in a target.
const TRIGGER_WORDS: [&str; 5] = ["tool", "callback", "provider", "config", "bean"];

/// Path fragment that marks the protocol-server module.
const MODULE_MARKER: &str = "mcp";

/// Summarize a set of change records.
///
/// Pure and deterministic: the same records always produce the same summary.
pub fn analyze(records: &[ChangeRecord]) -> AnalysisSummary {
    if records.is_empty() {
        return AnalysisSummary::empty();
    }

    let counts = count_by_kind(records);
    let pattern = identify_pattern(&counts);

    let summary = AnalysisSummary {
        intent: infer_intent(records, pattern),
        scope: determine_scope(records),
        key_changes: extract_key_changes(records),
        complexity: complexity(records),
        metadata: AnalysisMetadata {
            total_changes: records.len(),
            pattern: Some(pattern),
            changes_by_kind: counts,
            changes_by_file: count_by_file(records),
            keywords: collect_keywords(records),
        },
    };

    debug!(
        intent = %summary.intent,
        scope = %summary.scope,
        complexity = summary.complexity,
        pattern = %pattern,
        "Analyzed {} change records",
        records.len()
    );

    summary
}

fn count_by_kind(records: &[ChangeRecord]) -> BTreeMap<ChangeKind, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.kind()).or_insert(0) += 1;
    }
    counts
}

fn count_by_file(records: &[ChangeRecord]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.file().to_string()).or_insert(0) += 1;
    }
    counts
}

fn identify_pattern(counts: &BTreeMap<ChangeKind, usize>) -> ChangePattern {
    let count = |kind: ChangeKind| counts.get(&kind).copied().unwrap_or(0);
    let methods = count(ChangeKind::MethodAdded);
    let annotations = count(ChangeKind::AnnotationAdded);
    let configs = count(ChangeKind::ConfigurationAdded);

    if configs > 0 && methods > 0 {
        ChangePattern::FeatureWithConfig
    } else if annotations > 0 && methods > 0 {
        ChangePattern::AnnotationDrivenFeature
    } else if methods > 0 {
        ChangePattern::NewFunctionality
    } else if configs > 0 {
        ChangePattern::ConfigurationChange
    } else {
        ChangePattern::MiscChanges
    }
}

fn infer_intent(records: &[ChangeRecord], pattern: ChangePattern) -> Intent {
    let content = records
        .iter()
        .map(ChangeRecord::target)
        .collect::<Vec<_>>()
        .join(" ");

    if content.contains("Tool") && content.contains("ApplicationContext") {
        Intent::ToolAutoDiscovery
    } else if content.contains("scan") && content.contains("Bean") {
        Intent::ComponentAutoRegistration
    } else if content.contains("Provider") && content.contains("Callback") {
        Intent::ProviderConfiguration
    } else if pattern == ChangePattern::AnnotationDrivenFeature {
        Intent::AnnotationBasedFeature
    } else {
        Intent::GeneralImprovement
    }
}

fn determine_scope(records: &[ChangeRecord]) -> Scope {
    if records.iter().any(|r| r.file().contains(MODULE_MARKER)) {
        Scope::Mcp
    } else if records.iter().any(|r| r.target().contains("Tool")) {
        Scope::Tool
    } else if records.iter().any(|r| r.file().contains("Application")) {
        Scope::App
    } else {
        Scope::Core
    }
}

fn is_significant(record: &ChangeRecord) -> bool {
    match record.kind() {
        ChangeKind::MethodAdded | ChangeKind::ConfigurationAdded => true,
        ChangeKind::AnnotationAdded => !record.target().contains("Override"),
        _ => false,
    }
}

fn summarize(record: &ChangeRecord) -> String {
    match record.kind() {
        ChangeKind::MethodAdded => format!("method added: {}", record.target()),
        ChangeKind::ConfigurationAdded => format!("configuration added: {}", record.target()),
        ChangeKind::AnnotationAdded => format!("annotation applied: {}", record.target()),
        other => format!("{}: {}", other, record.target()),
    }
}

fn extract_key_changes(records: &[ChangeRecord]) -> Vec<String> {
    let mut key_changes: Vec<String> = Vec::new();
    for summary in records.iter().filter(|r| is_significant(r)).map(summarize) {
        if key_changes.len() == MAX_KEY_CHANGES {
            break;
        }
        if !key_changes.contains(&summary) {
            key_changes.push(summary);
        }
    }
    key_changes
}

fn kind_weight(kind: ChangeKind) -> u32 {
    match kind {
        ChangeKind::MethodAdded | ChangeKind::ClassAdded => 2,
        ChangeKind::ConfigurationAdded => 3,
        _ => 1,
    }
}

/// `1 + min(n, 5) + Σ weight(kind)`, clamped to [`MAX_COMPLEXITY`].
fn complexity(records: &[ChangeRecord]) -> u8 {
    let base = 1 + records.len().min(5) as u32;
    let weighted: u32 = records.iter().map(|r| kind_weight(r.kind())).sum();
    (base + weighted).min(MAX_COMPLEXITY as u32) as u8
}

fn collect_keywords(records: &[ChangeRecord]) -> Vec<String> {
    let mut keywords: Vec<String> = Vec::new();
    for keyword in records.iter().flat_map(|r| extract_keywords(r.target())) {
        if !keywords.contains(&keyword) {
            keywords.push(keyword);
        }
    }
    keywords
}

fn extract_keywords(target: &str) -> Vec<String> {
    let mut keywords: Vec<String> = CAPITALIZED_WORD
        .find_iter(target)
        .map(|m| m.as_str().to_lowercase())
        .collect();

    let lowered = target.to_lowercase();
    keywords.extend(
        TRIGGER_WORDS
            .iter()
            .filter(|word| lowered.contains(*word))
            .map(|word| word.to_string()),
    );

    keywords
}
