//! Structured extraction — free text in, validated [`CodebaseTree`] out.
//!
//! The engine first tries to parse the raw completion directly. On any parse
//! or validation failure — an empty tree counts as a validation failure, not
//! a degenerate success — it enters a bounded repair loop: the capability is
//! re-prompted with the original text, the target schema, and the specific
//! error, and the corrected response is re-parsed. The loop stops on the
//! first success or after exactly `repair_attempts` corrections, surfacing
//! the last error rather than swallowing it.

pub mod sanitize;

pub use sanitize::sanitize;

use appforge_core::error::{Error, ExtractionError};
use appforge_core::provider::{Provider, ProviderRequest};
use appforge_core::schema::CodebaseTree;
use std::sync::Arc;
use tracing::{debug, warn};

/// Converts stage-4 output into a validated codebase tree.
pub struct Extractor {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    repair_attempts: u32,
}

impl Extractor {
    /// Create an extractor with the default repair budget of 3.
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            repair_attempts: 3,
        }
    }

    /// Set the repair budget `R`.
    pub fn with_repair_attempts(mut self, attempts: u32) -> Self {
        self.repair_attempts = attempts;
        self
    }

    /// Set the repair-prompt temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Extract a validated tree from raw model output.
    pub async fn extract(&self, raw: &str) -> Result<CodebaseTree, Error> {
        let mut last_error = match try_parse(raw) {
            Ok(tree) => {
                debug!(files = tree.file_count(), "Raw output parsed on first attempt");
                return Ok(tree);
            }
            Err(e) => e,
        };

        for attempt in 1..=self.repair_attempts {
            warn!(attempt, max = self.repair_attempts, error = %last_error, "Repairing structured output");

            let prompt = repair_prompt(raw, &last_error);
            let request = ProviderRequest::generation(&self.model, prompt, self.temperature);
            let response = self.provider.complete(request).await?;

            match try_parse(&response.message.content) {
                Ok(tree) => {
                    debug!(attempt, files = tree.file_count(), "Repair produced a valid tree");
                    return Ok(tree);
                }
                Err(e) => last_error = e,
            }
        }

        Err(ExtractionError::SchemaValidation {
            attempts: self.repair_attempts,
            reason: last_error,
        }
        .into())
    }
}

/// Parse and validate one candidate text. Returns the validation error as
/// repair-prompt material on failure.
fn try_parse(text: &str) -> Result<CodebaseTree, String> {
    let cleaned = sanitize(strip_code_fence(text));

    let mut tree: CodebaseTree =
        serde_json::from_str(&cleaned).map_err(|e| format!("invalid JSON: {e}"))?;

    sanitize_tree(&mut tree);
    tree.validate()?;
    Ok(tree)
}

/// Models often wrap JSON in a markdown code fence; strip one if present.
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the optional language tag on the opening fence line.
    match rest.split_once('\n') {
        Some((_, body)) => body.trim(),
        None => rest.trim(),
    }
}

/// Re-apply the sanitization contract to every file body in place.
fn sanitize_tree(tree: &mut CodebaseTree) {
    fn walk(folders: &mut [appforge_core::schema::FolderNode]) {
        for folder in folders {
            for file in &mut folder.files {
                file.content = sanitize(&file.content);
            }
            walk(&mut folder.folders);
        }
    }
    for file in &mut tree.files {
        file.content = sanitize(&file.content);
    }
    walk(&mut tree.folders);
}

fn repair_prompt(raw: &str, error: &str) -> String {
    let schema = serde_json::to_string_pretty(&CodebaseTree::json_schema())
        .unwrap_or_else(|_| "{}".into());
    format!(
        "The following output failed to parse as a codebase tree.\n\
         \n\
         Validation error:\n{error}\n\
         \n\
         Target JSON schema:\n{schema}\n\
         \n\
         Original output:\n{raw}\n\
         \n\
         Respond with ONLY the corrected JSON object. It must conform to the \
         schema and contain at least one folder or file."
    )
}
