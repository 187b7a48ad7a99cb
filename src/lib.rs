//! commitsmith - suggests conventional commit messages from pending git changes.
//!
//! # Overview
//!
//! commitsmith reads the staged (or working tree) diff, detects structural
//! edits line by line, summarizes them, and asks a local Ollama model for
//! ranked commit message candidates. Without a model it falls back to
//! heuristic messages built from the summary alone.

pub mod analysis;
pub mod commit;
pub mod config;
pub mod diff;
pub mod error;
pub mod git;
pub mod llm;
pub mod suggest;

// Re-export commonly used types
pub use analysis::{AnalysisSummary, Intent, Scope, analyze};
pub use config::Settings;
pub use diff::{ChangeKind, ChangeRecord, parse_diff};
pub use error::{CommandError, CommitError, ConfigError, ModelError};
pub use suggest::{CommitSuggester, ConnectionStatus, SuggestionRequest, SuggestionResponse};
