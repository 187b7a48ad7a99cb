//! Error types for commitsmith modules using thiserror.

use thiserror::Error;

/// Errors from running the `git` binary.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("git executable not found in PATH")]
    NotInstalled,

    #[error("Failed to spawn git {command}: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("git {command} timed out after {secs} seconds")]
    Timeout { command: String, secs: u64 },

    #[error("git {command} exited with code {code}: {output}")]
    NonZeroExit {
        command: String,
        code: i32,
        output: String,
    },
}

/// Errors from the model backend.
///
/// Variants are already resolved to their root cause when constructed, so
/// retry classification only needs to look at the variant.
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Connection refused by model server at {0}")]
    ConnectionRefused(String),

    #[error("Model server did not respond in time: {0}")]
    Timeout(String),

    #[error("Could not resolve model server host: {0}")]
    UnknownHost(String),

    #[error("Model '{0}' not found on server")]
    ModelNotFound(String),

    #[error("Model server returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Model server returned an unreadable response: {0}")]
    InvalidResponse(String),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

impl ModelError {
    /// Whether the failure is a network-level hiccup worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, ModelError::ConnectionRefused(_) | ModelError::Timeout(_))
    }

    /// A short diagnostic hint for the user.
    pub fn hint(&self) -> &'static str {
        match self {
            ModelError::ConnectionRefused(_) => {
                "Cannot reach the model server (connection refused). Check that the server is running and listening on the configured port (Ollama defaults to 11434)."
            }
            ModelError::Timeout(_) => {
                "The model server responded too slowly. The model may still be loading; raise COMMITSMITH_READ_TIMEOUT or try again."
            }
            ModelError::UnknownHost(_) => {
                "The model server host name could not be resolved. Verify COMMITSMITH_BASE_URL."
            }
            ModelError::ModelNotFound(_) => {
                "The requested model is not available on the server. Pull it first or set COMMITSMITH_MODEL to an existing model."
            }
            ModelError::Http { .. } | ModelError::InvalidResponse(_) | ModelError::Client(_) => {
                "Check the model server logs for details."
            }
        }
    }

    /// Classify a reqwest failure by walking its source chain.
    pub fn from_reqwest(err: reqwest::Error, base_url: &str) -> Self {
        let chain = error_chain_text(&err);

        if err.is_timeout() || chain.contains("timed out") {
            return ModelError::Timeout(base_url.to_string());
        }

        if err.is_connect() {
            if chain.contains("dns error")
                || chain.contains("failed to lookup address")
                || chain.contains("Name or service not known")
                || chain.contains("nodename nor servname")
            {
                return ModelError::UnknownHost(base_url.to_string());
            }
            return ModelError::ConnectionRefused(base_url.to_string());
        }

        if err.is_decode() {
            return ModelError::InvalidResponse(err.to_string());
        }

        ModelError::Client(err.to_string())
    }
}

/// Join an error and all of its sources into one string.
fn error_chain_text(err: &dyn std::error::Error) -> String {
    let mut text = err.to_string();
    let mut current = err.source();
    while let Some(cause) = current {
        text.push_str(": ");
        text.push_str(&cause.to_string());
        current = cause.source();
    }
    text
}

/// Errors from loading settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Unsupported language '{0}'. Use 'ko' or 'en'.")]
    UnsupportedLanguage(String),

    #[error("Failed to determine the current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
}

/// Errors from committing a chosen message.
#[derive(Error, Debug)]
pub enum CommitError {
    #[error("A commit message is required")]
    EmptyMessage,

    #[error("Failed to write commit message file: {0}")]
    TempFile(#[source] std::io::Error),

    #[error("git commit exited with code {0}")]
    GitFailed(i32),

    #[error(transparent)]
    Command(#[from] CommandError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        assert!(ModelError::ConnectionRefused("x".into()).is_transient());
        assert!(ModelError::Timeout("x".into()).is_transient());
        assert!(!ModelError::UnknownHost("x".into()).is_transient());
        assert!(!ModelError::ModelNotFound("m".into()).is_transient());
        assert!(
            !ModelError::Http {
                status: 500,
                body: String::new()
            }
            .is_transient()
        );
    }

    #[test]
    fn test_hints_point_at_the_right_setting() {
        assert!(ModelError::UnknownHost("x".into()).hint().contains("BASE_URL"));
        assert!(ModelError::ModelNotFound("m".into()).hint().contains("COMMITSMITH_MODEL"));
        assert!(ModelError::ConnectionRefused("x".into()).hint().contains("11434"));
    }

    #[test]
    fn test_error_chain_text_includes_sources() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "inner cause");
        let outer = CommitError::TempFile(inner);
        let text = error_chain_text(&outer);
        assert!(text.contains("Failed to write commit message file"));
        assert!(text.contains("inner cause"));
    }
}
