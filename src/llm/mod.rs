//! Chat model access with retry and output-language enforcement.

pub mod client;
pub mod language;
pub mod retry;

pub use client::{ChatMessage, ChatModel, OllamaClient, Role};
pub use language::{LanguageGate, TargetLanguage};
pub use retry::RetryPolicy;
