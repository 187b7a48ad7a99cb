//! Semantic summary of a set of change records.

pub mod analyzer;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::diff::ChangeKind;

pub use analyzer::analyze;

/// Upper bound on the number of key changes kept in a summary.
pub const MAX_KEY_CHANGES: usize = 5;

/// Highest complexity score.
pub const MAX_COMPLEXITY: u8 = 10;

/// Overall shape of a change set, derived from record kind counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangePattern {
    FeatureWithConfig,
    AnnotationDrivenFeature,
    NewFunctionality,
    ConfigurationChange,
    MiscChanges,
}

impl ChangePattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangePattern::FeatureWithConfig => "feature_with_config",
            ChangePattern::AnnotationDrivenFeature => "annotation_driven_feature",
            ChangePattern::NewFunctionality => "new_functionality",
            ChangePattern::ConfigurationChange => "configuration_change",
            ChangePattern::MiscChanges => "misc_changes",
        }
    }
}

impl fmt::Display for ChangePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the change set appears to be trying to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    ToolAutoDiscovery,
    ComponentAutoRegistration,
    ProviderConfiguration,
    AnnotationBasedFeature,
    GeneralImprovement,
    NoChanges,
    Other(String),
}

impl Intent {
    pub fn as_str(&self) -> &str {
        match self {
            Intent::ToolAutoDiscovery => "tool_auto_discovery",
            Intent::ComponentAutoRegistration => "component_auto_registration",
            Intent::ProviderConfiguration => "provider_configuration",
            Intent::AnnotationBasedFeature => "annotation_based_feature",
            Intent::GeneralImprovement => "general_improvement",
            Intent::NoChanges => "no_changes",
            Intent::Other(label) => label,
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Intent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Area of the codebase a change set touches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Mcp,
    Tool,
    App,
    Core,
    /// Nothing changed.
    Unscoped,
    Other(String),
}

impl Scope {
    pub fn as_str(&self) -> &str {
        match self {
            Scope::Mcp => "mcp",
            Scope::Tool => "tool",
            Scope::App => "app",
            Scope::Core => "core",
            Scope::Unscoped => "none",
            Scope::Other(label) => label,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Counts and keywords gathered while analyzing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AnalysisMetadata {
    pub total_changes: usize,
    pub pattern: Option<ChangePattern>,
    pub changes_by_kind: BTreeMap<ChangeKind, usize>,
    pub changes_by_file: BTreeMap<String, usize>,
    /// Distinct keywords in first-seen order.
    pub keywords: Vec<String>,
}

/// One semantic summary per analyzed change set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisSummary {
    pub intent: Intent,
    pub scope: Scope,
    /// At most [`MAX_KEY_CHANGES`] unique entries.
    pub key_changes: Vec<String>,
    /// 0 for an empty change set, otherwise 1..=10.
    pub complexity: u8,
    pub metadata: AnalysisMetadata,
}

impl AnalysisSummary {
    /// The summary of an empty change set.
    pub fn empty() -> Self {
        Self {
            intent: Intent::NoChanges,
            scope: Scope::Unscoped,
            key_changes: Vec::new(),
            complexity: 0,
            metadata: AnalysisMetadata::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.total_changes == 0
    }
}
