//! Request and response types at the suggestion boundary.

use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_SUGGESTIONS: u32 = 9;

/// What the caller wants generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SuggestionRequest {
    /// Requested number of candidates; 0 is treated as 1.
    pub max_suggestions: u32,
    /// Prefer the staged diff over the working tree.
    pub staged_first: bool,
}

impl Default for SuggestionRequest {
    fn default() -> Self {
        Self {
            max_suggestions: DEFAULT_MAX_SUGGESTIONS,
            staged_first: true,
        }
    }
}

impl SuggestionRequest {
    pub fn new(max_suggestions: u32, staged_first: bool) -> Self {
        Self {
            max_suggestions: max_suggestions.max(1),
            staged_first,
        }
    }

    /// Number of candidates to ask for, never below 1.
    pub fn limit(&self) -> usize {
        self.max_suggestions.max(1) as usize
    }
}

/// Candidates plus a human-readable status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionResponse {
    pub suggestions: Vec<String>,
    pub message: String,
}

impl SuggestionResponse {
    pub fn new(suggestions: Vec<String>, message: impl Into<String>) -> Self {
        Self {
            suggestions,
            message: message.into(),
        }
    }

    /// A response with no candidates, used for every failure path.
    pub fn empty(message: impl Into<String>) -> Self {
        Self::new(Vec::new(), message)
    }
}

/// Outcome of the model connection probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionStatus {
    pub connected: bool,
    pub message: String,
}
