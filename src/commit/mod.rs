//! Commit message candidates: heuristic synthesis, prompt, and reply parsing.

pub mod prompt;
pub mod response;
pub mod synthesize;

pub use prompt::{PromptInput, build_suggestion_prompt, sanitize_diff};
pub use response::parse_suggestions;
pub use synthesize::synthesize;
