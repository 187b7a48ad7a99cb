//! End-to-end suggestion flow: collect, parse, analyze, generate.

pub mod dto;

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::analysis::analyze;
use crate::commit::{PromptInput, build_suggestion_prompt, parse_suggestions, synthesize};
use crate::config::{MODEL_ENV_VAR, Settings};
use crate::diff::parse_diff;
use crate::error::{CommitError, ModelError};
use crate::git::{CommandRunner, collect_changed_files, collect_diff, commit_with_message};
use crate::llm::{ChatMessage, ChatModel, LanguageGate, RetryPolicy, TargetLanguage};

pub use dto::{ConnectionStatus, SuggestionRequest, SuggestionResponse};

/// Prompt used to check that the model answers at all.
pub const PROBE_PROMPT: &str = "Hello, respond with just 'OK'";

pub const NO_CHANGES_MESSAGE: &str = "No changes found.";

/// Produces commit message candidates for the pending changes of one
/// repository. Holds no state between requests.
pub struct CommitSuggester {
    git: Arc<dyn CommandRunner>,
    model: Option<Arc<dyn ChatModel>>,
    provider: String,
    model_name: String,
    language: TargetLanguage,
    retry: RetryPolicy,
}

impl CommitSuggester {
    /// `model` is `None` in heuristic mode.
    pub fn new(
        git: Arc<dyn CommandRunner>,
        model: Option<Arc<dyn ChatModel>>,
        settings: &Settings,
    ) -> Self {
        Self {
            git,
            model,
            provider: settings.provider.clone(),
            model_name: settings.model_label().to_string(),
            language: settings.language,
            retry: settings.retry,
        }
    }

    /// Generate candidates for the pending diff.
    ///
    /// Never fails: every problem is reported through an empty suggestion
    /// list and a descriptive message.
    pub async fn generate(&self, request: &SuggestionRequest) -> SuggestionResponse {
        let started = Instant::now();

        let diff = collect_diff(self.git.as_ref(), request.staged_first).await;
        if diff.trim().is_empty() {
            return SuggestionResponse::empty(NO_CHANGES_MESSAGE);
        }

        let records = parse_diff(&diff);
        let summary = analyze(&records);
        debug!(
            records = records.len(),
            intent = %summary.intent,
            scope = %summary.scope,
            complexity = summary.complexity,
            "Analyzed pending diff"
        );

        let Some(model) = &self.model else {
            warn!("No model configured, falling back to heuristic messages");
            let mut suggestions = synthesize(&summary, self.language);
            suggestions.truncate(request.limit());
            return SuggestionResponse::new(
                suggestions,
                format!(
                    "No model is configured, so heuristic messages were generated. Set {MODEL_ENV_VAR} to use a model."
                ),
            );
        };

        let files = collect_changed_files(self.git.as_ref(), request.staged_first).await;
        let prompt = build_suggestion_prompt(&PromptInput {
            summary: &summary,
            diff: &diff,
            files: &files,
            max_suggestions: request.limit(),
            language: self.language,
        });
        debug!("Built prompt of {} bytes for {} files", prompt.len(), files.len());

        info!(provider = %self.provider, model = %self.model_name, "Generating commit messages");

        let gate = LanguageGate::new(self.language);
        let result = gate
            .enforce(&prompt, |messages| self.call_model(model, messages))
            .await;

        let elapsed = started.elapsed();
        match result {
            Ok(reply) => {
                let mut suggestions = parse_suggestions(&reply);
                suggestions.truncate(request.limit());
                info!(
                    provider = %self.provider,
                    model = %self.model_name,
                    suggestions = suggestions.len(),
                    "Generated commit messages in {} ms ({:.3} s)",
                    elapsed.as_millis(),
                    elapsed.as_secs_f64()
                );
                let message = format!(
                    "Generated {} messages with {} ({})",
                    suggestions.len(),
                    self.provider.to_uppercase(),
                    self.model_name
                );
                SuggestionResponse::new(suggestions, message)
            }
            Err(e) => {
                warn!(
                    provider = %self.provider,
                    model = %self.model_name,
                    "Commit message generation failed after {} ms ({:.3} s): {}",
                    elapsed.as_millis(),
                    elapsed.as_secs_f64(),
                    e
                );
                SuggestionResponse::empty(format!(
                    "LLM call failed ({}): {}. {}",
                    self.provider,
                    e,
                    e.hint()
                ))
            }
        }
    }

    /// Send a short probe through the retry policy and report the outcome.
    pub async fn check_connection(&self) -> ConnectionStatus {
        let Some(model) = &self.model else {
            return ConnectionStatus {
                connected: false,
                message: format!(
                    "No model configured (heuristic mode).\nProvider: {}\nSet {MODEL_ENV_VAR} to enable model suggestions.",
                    self.provider
                ),
            };
        };

        match self.call_model(model, vec![ChatMessage::user(PROBE_PROMPT)]).await {
            Ok(reply) => ConnectionStatus {
                connected: true,
                message: format!(
                    "LLM connection OK\nProvider: {}\nModel: {}\nTest reply: {}",
                    self.provider,
                    self.model_name,
                    reply.trim()
                ),
            },
            Err(e) => ConnectionStatus {
                connected: false,
                message: format!(
                    "LLM connection failed\nProvider: {}\nModel: {}\nError: {}\nHint: {}",
                    self.provider,
                    self.model_name,
                    e,
                    e.hint()
                ),
            },
        }
    }

    /// Commit the staged changes with `message`.
    pub async fn commit(&self, message: &str) -> Result<(), CommitError> {
        commit_with_message(self.git.as_ref(), message).await
    }

    async fn call_model(
        &self,
        model: &Arc<dyn ChatModel>,
        messages: Vec<ChatMessage>,
    ) -> Result<String, ModelError> {
        let messages = &messages;
        self.retry
            .run(move || model.chat(messages), ModelError::is_transient)
            .await
    }
}
