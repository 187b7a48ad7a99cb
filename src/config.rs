//! Settings read once from the environment at startup.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use tracing::warn;

use crate::error::ConfigError;
use crate::git::resolve_root;
use crate::llm::{RetryPolicy, TargetLanguage};

pub const WORK_DIR_ENV_VAR: &str = "COMMITSMITH_WORK_DIR";
pub const PROVIDER_ENV_VAR: &str = "COMMITSMITH_PROVIDER";
pub const BASE_URL_ENV_VAR: &str = "COMMITSMITH_BASE_URL";
pub const MODEL_ENV_VAR: &str = "COMMITSMITH_MODEL";
pub const CONNECT_TIMEOUT_ENV_VAR: &str = "COMMITSMITH_CONNECT_TIMEOUT";
pub const READ_TIMEOUT_ENV_VAR: &str = "COMMITSMITH_READ_TIMEOUT";
pub const LANGUAGE_ENV_VAR: &str = "COMMITSMITH_LANGUAGE";
pub const RETRY_ATTEMPTS_ENV_VAR: &str = "COMMITSMITH_RETRY_ATTEMPTS";
pub const RETRY_BACKOFF_ENV_VAR: &str = "COMMITSMITH_RETRY_BACKOFF_MS";

pub const DEFAULT_PROVIDER: &str = "ollama";
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";
pub const DEFAULT_MODEL: &str = "llama3.1";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_READ_TIMEOUT_SECS: u64 = 300;
const DEFAULT_RETRY_ATTEMPTS: u64 = 3;
const DEFAULT_RETRY_BACKOFF_MS: u64 = 400;

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Directory git commands run in.
    pub work_dir: PathBuf,
    /// Provider label shown in status messages.
    pub provider: String,
    pub base_url: String,
    /// `None` runs in heuristic mode without a model.
    pub model: Option<String>,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub language: TargetLanguage,
    pub retry: RetryPolicy,
}

impl Settings {
    /// Read every setting from the environment and resolve the repository
    /// root.
    pub fn load() -> Result<Self, ConfigError> {
        let candidates = work_dir_candidates()?;
        let work_dir = resolve_root(&candidates).unwrap_or_else(|| PathBuf::from("."));

        let model = match env::var(MODEL_ENV_VAR) {
            Ok(v) if v.trim().is_empty() => None,
            Ok(v) => Some(v.trim().to_string()),
            Err(_) => Some(DEFAULT_MODEL.to_string()),
        };

        let language = match env::var(LANGUAGE_ENV_VAR) {
            Ok(v) if !v.trim().is_empty() => v.parse().unwrap_or_else(|e| {
                warn!("{}, using default {}", e, TargetLanguage::default());
                TargetLanguage::default()
            }),
            _ => TargetLanguage::default(),
        };

        let attempts = env_u64(RETRY_ATTEMPTS_ENV_VAR, DEFAULT_RETRY_ATTEMPTS);
        let retry = RetryPolicy::new(
            u32::try_from(attempts).unwrap_or(u32::MAX),
            Duration::from_millis(env_u64(RETRY_BACKOFF_ENV_VAR, DEFAULT_RETRY_BACKOFF_MS)),
        );

        Ok(Self {
            work_dir,
            provider: env_string(PROVIDER_ENV_VAR, DEFAULT_PROVIDER),
            base_url: env_string(BASE_URL_ENV_VAR, DEFAULT_BASE_URL),
            model,
            connect_timeout: Duration::from_secs(env_u64(
                CONNECT_TIMEOUT_ENV_VAR,
                DEFAULT_CONNECT_TIMEOUT_SECS,
            )),
            read_timeout: Duration::from_secs(env_u64(READ_TIMEOUT_ENV_VAR, DEFAULT_READ_TIMEOUT_SECS)),
            language,
            retry,
        })
    }

    /// Model name for display, or `none` in heuristic mode.
    pub fn model_label(&self) -> &str {
        self.model.as_deref().unwrap_or("none")
    }
}

/// Explicit override, then the current directory, then the directory of the
/// running executable.
fn work_dir_candidates() -> Result<Vec<PathBuf>, ConfigError> {
    let mut candidates = Vec::new();

    if let Ok(dir) = env::var(WORK_DIR_ENV_VAR)
        && !dir.trim().is_empty()
    {
        candidates.push(PathBuf::from(dir.trim()));
    }

    match env::current_dir() {
        Ok(dir) => candidates.push(dir),
        Err(e) if candidates.is_empty() => return Err(ConfigError::CurrentDir(e)),
        Err(e) => warn!("Failed to read current directory: {}", e),
    }

    if let Ok(exe) = env::current_exe()
        && let Some(parent) = exe.parent()
    {
        candidates.push(parent.to_path_buf());
    }

    Ok(candidates)
}

fn env_string(var: &str, default: &str) -> String {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => default.to_string(),
    }
}

/// Read a non-negative integer, warning and falling back on invalid values.
fn env_u64(var: &str, default: u64) -> u64 {
    match env::var(var) {
        Ok(v) if !v.is_empty() => match v.trim().parse::<u64>() {
            Ok(n) => n,
            Err(_) => {
                warn!("Invalid {} value '{}', using default {}", var, v, default);
                default
            }
        },
        _ => default,
    }
}
