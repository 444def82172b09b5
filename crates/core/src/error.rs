//! Error types for the appforge domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; everything aggregates into
//! the top-level [`Error`], which also carries the process exit-code mapping.

use thiserror::Error;

/// The top-level error type for all appforge operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Reference context / templates ---
    #[error("Context error: {0}")]
    Context(#[from] ContextError),

    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    // --- Pipeline stages ---
    #[error("Stage error: {0}")]
    Stage(#[from] StageError),

    // --- Structured extraction ---
    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    // --- Generation capability ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Tool layer ---
    #[error("Tool error: {0}")]
    Tool(#[from] ToolError),

    // --- Materialization agent ---
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    // --- Configuration ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Process exit code for this error.
    ///
    /// Each taxonomy entry maps to a distinct status code so shell callers
    /// can branch on the failure class without parsing log output.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config { .. } => 2,
            Error::Context(_) | Error::Template(_) => 3,
            Error::Stage(_) => 4,
            Error::Extraction(_) => 5,
            Error::Agent(AgentError::IterationBudgetExceeded { .. }) => 6,
            Error::Provider(_) => 7,
            Error::Tool(_) => 8,
            _ => 1,
        }
    }
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

#[derive(Debug, Error)]
pub enum ContextError {
    #[error("Missing resource '{name}' (looked in {path})")]
    MissingResource { name: String, path: String },

    #[error("Failed to read resource '{name}': {reason}")]
    Read { name: String, reason: String },
}

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("No value bound for template variable '{name}'")]
    MissingValue { name: String },

    #[error("Unclosed '{{' delimiter at byte {position}")]
    UnclosedDelimiter { position: usize },

    #[error("Stray '}}' delimiter at byte {position}")]
    StrayDelimiter { position: usize },

    #[error("Empty placeholder '{{}}' at byte {position}")]
    EmptyPlaceholder { position: usize },
}

#[derive(Debug, Error)]
pub enum StageError {
    #[error("Stage '{stage}' references '{dependency}', which is not produced by any earlier stage or fixed context")]
    UnknownDependency { stage: String, dependency: String },

    #[error("Duplicate stage id '{0}' in chain")]
    DuplicateStage(String),

    #[error("Generation failed at stage '{stage}': {reason}")]
    Generation { stage: String, reason: String },

    #[error("Failed to persist document '{key}': {reason}")]
    Persist { key: String, reason: String },

    #[error("No document stored under key '{key}'")]
    MissingDocument { key: String },
}

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Schema validation failed after {attempts} repair attempt(s): {reason}")]
    SchemaValidation { attempts: u32, reason: String },
}

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("Sandbox violation: path '{path}' escapes the project root")]
    SandboxViolation { path: String },
}

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Iteration budget of {budget} exhausted without completion (session '{session}')")]
    IterationBudgetExceeded { budget: u32, session: String },

    #[error("Session store error: {0}")]
    SessionStore(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_error_names_failing_stage() {
        let err = Error::Stage(StageError::Generation {
            stage: "navigation".into(),
            reason: "backend unreachable".into(),
        });
        assert!(err.to_string().contains("navigation"));
        assert!(err.to_string().contains("backend unreachable"));
    }

    #[test]
    fn extraction_error_carries_attempts() {
        let err = Error::Extraction(ExtractionError::SchemaValidation {
            attempts: 3,
            reason: "tree must contain at least one folder or file".into(),
        });
        assert!(err.to_string().contains("3 repair attempt"));
    }

    #[test]
    fn exit_codes_are_distinct_per_taxonomy_entry() {
        let errors: Vec<Error> = vec![
            Error::Config { message: "bad".into() },
            Error::Context(ContextError::MissingResource {
                name: "context".into(),
                path: "/tmp".into(),
            }),
            Error::Stage(StageError::Generation {
                stage: "s1".into(),
                reason: "x".into(),
            }),
            Error::Extraction(ExtractionError::SchemaValidation {
                attempts: 1,
                reason: "x".into(),
            }),
            Error::Agent(AgentError::IterationBudgetExceeded {
                budget: 10,
                session: "s".into(),
            }),
            Error::Provider(ProviderError::Network("down".into())),
            Error::Tool(ToolError::NotFound("write_file".into())),
        ];
        let mut codes: Vec<i32> = errors.iter().map(Error::exit_code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len(), "exit codes must not collide");
    }
}
