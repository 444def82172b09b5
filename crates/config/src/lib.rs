//! Configuration loading and validation for appforge.
//!
//! Loads configuration from `~/.appforge/config.toml` with environment
//! variable overrides. Validates all settings at load time.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.appforge/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// API key for the generation backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Model to use for every pipeline stage and the agent
    #[serde(default = "default_model")]
    pub model: String,

    /// Generation temperature (0.0 = deterministic)
    #[serde(default)]
    pub temperature: f32,

    /// Maximum tokens per completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Context window hint passed to the backend, if it supports one
    #[serde(default = "default_context_window")]
    pub context_window: u32,

    /// Maximum agent loop iterations per run (the iteration budget `I`)
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Whole-run retry count on capability failure (`RETRY_NUMBER`)
    #[serde(default = "default_retry_number")]
    pub retry_number: u32,

    /// Structured-extraction repair attempts (`R`)
    #[serde(default = "default_repair_attempts")]
    pub repair_attempts: u32,

    /// Per-request timeout for generation calls, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Directory layout
    #[serde(default)]
    pub paths: PathsConfig,
}

fn default_api_url() -> String {
    "https://api.openai.com/v1".into()
}
fn default_model() -> String {
    "gpt-4.1".into()
}
fn default_max_tokens() -> u32 {
    8192
}
fn default_context_window() -> u32 {
    128_000
}
fn default_max_iterations() -> u32 {
    50
}
fn default_retry_number() -> u32 {
    3
}
fn default_repair_attempts() -> u32 {
    3
}
fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: default_api_url(),
            model: default_model(),
            temperature: 0.0,
            max_tokens: default_max_tokens(),
            context_window: default_context_window(),
            max_iterations: default_max_iterations(),
            retry_number: default_retry_number(),
            repair_attempts: default_repair_attempts(),
            request_timeout_secs: default_request_timeout_secs(),
            paths: PathsConfig::default(),
        }
    }
}

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for GeneratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeneratorConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("context_window", &self.context_window)
            .field("max_iterations", &self.max_iterations)
            .field("retry_number", &self.retry_number)
            .field("repair_attempts", &self.repair_attempts)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("paths", &self.paths)
            .finish()
    }
}

/// Where prompts, reference context, stage documents, generated files, and
/// session transcripts live. Relative paths resolve against the current
/// working directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Prompt template directory
    #[serde(default = "default_prompts_dir")]
    pub prompts_dir: PathBuf,

    /// Reference context directory
    #[serde(default = "default_context_dir")]
    pub context_dir: PathBuf,

    /// Durable stage-output documents
    #[serde(default = "default_docs_dir")]
    pub docs_dir: PathBuf,

    /// Sandbox root for the generated project
    #[serde(default = "default_project_dir")]
    pub project_dir: PathBuf,

    /// Persisted agent session transcripts
    #[serde(default = "default_sessions_dir")]
    pub sessions_dir: PathBuf,
}

fn default_prompts_dir() -> PathBuf {
    GeneratorConfig::config_dir().join("prompts")
}
fn default_context_dir() -> PathBuf {
    GeneratorConfig::config_dir().join("context")
}
fn default_docs_dir() -> PathBuf {
    PathBuf::from("project_docs")
}
fn default_project_dir() -> PathBuf {
    PathBuf::from("project_files")
}
fn default_sessions_dir() -> PathBuf {
    GeneratorConfig::config_dir().join("sessions")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            prompts_dir: default_prompts_dir(),
            context_dir: default_context_dir(),
            docs_dir: default_docs_dir(),
            project_dir: default_project_dir(),
            sessions_dir: default_sessions_dir(),
        }
    }
}

/// Errors raised while loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

impl GeneratorConfig {
    /// Load configuration from the default path (`~/.appforge/config.toml`).
    ///
    /// Environment variables take priority over the file:
    /// - `APPFORGE_API_KEY`, then `OPENAI_API_KEY`, then `OPENROUTER_API_KEY`
    /// - `APPFORGE_MODEL` overrides the model
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        let mut config = Self::load_from(&config_path)?;

        if config.api_key.is_none() {
            config.api_key = std::env::var("APPFORGE_API_KEY")
                .ok()
                .or_else(|| std::env::var("OPENAI_API_KEY").ok())
                .or_else(|| std::env::var("OPENROUTER_API_KEY").ok());
        }

        if let Ok(model) = std::env::var("APPFORGE_MODEL") {
            config.model = model;
        }

        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".appforge")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.temperature < 0.0 || self.temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.max_iterations == 0 {
            return Err(ConfigError::ValidationError(
                "max_iterations must be at least 1".into(),
            ));
        }

        if self.retry_number == 0 {
            return Err(ConfigError::ValidationError(
                "retry_number must be at least 1".into(),
            ));
        }

        Ok(())
    }

    /// Check if an API key is available (from config or environment).
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Generate a default config TOML string (for the `init` command).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&Self::default()).unwrap_or_default()
    }
}

fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    let home = std::env::var("USERPROFILE");
    #[cfg(not(target_os = "windows"))]
    let home = std::env::var("HOME");

    PathBuf::from(home.unwrap_or_else(|_| ".".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_are_valid() {
        let config = GeneratorConfig::default();
        config.validate().unwrap();
        assert_eq!(config.retry_number, 3);
        assert_eq!(config.repair_attempts, 3);
        assert_eq!(config.max_iterations, 50);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config =
            GeneratorConfig::load_from(Path::new("/nonexistent/appforge/config.toml")).unwrap();
        assert_eq!(config.model, default_model());
    }

    #[test]
    fn load_from_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(
            f,
            "model = \"local-model\"\nmax_iterations = 12\nrepair_attempts = 5"
        )
        .unwrap();

        let config = GeneratorConfig::load_from(&path).unwrap();
        assert_eq!(config.model, "local-model");
        assert_eq!(config.max_iterations, 12);
        assert_eq!(config.repair_attempts, 5);
        // Untouched fields keep defaults
        assert_eq!(config.retry_number, 3);
    }

    #[test]
    fn invalid_temperature_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "temperature = 3.5").unwrap();

        let err = GeneratorConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn zero_iteration_budget_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "max_iterations = 0").unwrap();

        let err = GeneratorConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn malformed_toml_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "model = [not toml").unwrap();

        let err = GeneratorConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn debug_redacts_api_key() {
        let config = GeneratorConfig {
            api_key: Some("sk-secret".into()),
            ..Default::default()
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_round_trips() {
        let toml_str = GeneratorConfig::default_toml();
        let parsed: GeneratorConfig = toml::from_str(&toml_str).unwrap();
        parsed.validate().unwrap();
    }
}
