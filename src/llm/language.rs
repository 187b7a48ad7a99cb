//! Output-language detection and the one-shot corrective retry.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tracing::warn;

use crate::error::ConfigError;

use super::client::ChatMessage;

/// Share of non-blank lines without a native character above which a reply
/// is rejected.
pub const MINORITY_THRESHOLD: f64 = 0.6;

/// Language the generated descriptions must be written in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TargetLanguage {
    #[default]
    Korean,
    English,
}

impl TargetLanguage {
    pub fn code(&self) -> &'static str {
        match self {
            TargetLanguage::Korean => "ko",
            TargetLanguage::English => "en",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TargetLanguage::Korean => "Korean",
            TargetLanguage::English => "English",
        }
    }

    /// Whether `c` belongs to this language's script.
    pub fn is_native_char(&self, c: char) -> bool {
        match self {
            TargetLanguage::Korean => ('가'..='힣').contains(&c),
            TargetLanguage::English => c.is_ascii_alphabetic(),
        }
    }

    /// True when more than 60% of the non-blank lines of `text` contain no
    /// native character. Text without non-blank lines is never a minority.
    pub fn is_minority(&self, text: &str) -> bool {
        let mut lines = 0usize;
        let mut foreign = 0usize;
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            lines += 1;
            if !line.chars().any(|c| self.is_native_char(c)) {
                foreign += 1;
            }
        }
        lines > 0 && (foreign as f64 / lines as f64) > MINORITY_THRESHOLD
    }

    /// System instruction sent with the corrective call.
    pub fn corrective_instruction(&self) -> String {
        format!(
            "Your previous answer broke the rules. This time write every description 100% in {} and output only the required format.",
            self.name()
        )
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for TargetLanguage {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" | "korean" => Ok(TargetLanguage::Korean),
            "en" | "english" => Ok(TargetLanguage::English),
            other => Err(ConfigError::UnsupportedLanguage(other.to_string())),
        }
    }
}

/// Re-asks the model once when its reply is not in the target language.
#[derive(Debug, Clone, Copy)]
pub struct LanguageGate {
    language: TargetLanguage,
}

impl LanguageGate {
    pub fn new(language: TargetLanguage) -> Self {
        Self { language }
    }

    /// Send `prompt` through `call`; if the reply fails the dominance check,
    /// make exactly one corrective call and return its reply as is.
    pub async fn enforce<F, Fut, E>(&self, prompt: &str, mut call: F) -> Result<String, E>
    where
        F: FnMut(Vec<ChatMessage>) -> Fut,
        Fut: Future<Output = Result<String, E>>,
    {
        let reply = call(vec![ChatMessage::user(prompt)]).await?;
        if !self.language.is_minority(&reply) {
            return Ok(reply);
        }

        warn!(
            language = self.language.code(),
            "Model reply is not in the target language, asking once more"
        );

        call(vec![
            ChatMessage::system(self.language.corrective_instruction()),
            ChatMessage::user(prompt),
        ])
        .await
    }
}
