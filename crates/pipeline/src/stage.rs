//! Stage definitions and results.

use appforge_context::PromptTemplate;
use chrono::{DateTime, Utc};

/// The reserved input name every chain run starts from.
pub const DESCRIPTION_INPUT: &str = "description";

/// One step of the generation chain, defined statically at construction.
///
/// The stage's inputs are exactly its template's variables: the run
/// description, fixed context names, and the ids of earlier stages.
#[derive(Debug, Clone)]
pub struct GenerationStage {
    /// Stage identifier; later stages reference this as a template variable.
    pub id: String,

    /// Prompt template, with fixed context already bound.
    pub template: PromptTemplate,

    /// Durable key the stage's output is persisted under.
    pub persist_key: String,
}

/// The output of one executed stage.
#[derive(Debug, Clone)]
pub struct StageResult {
    /// Which stage produced this
    pub stage: String,

    /// Raw text completion
    pub output: String,

    /// When the stage completed
    pub timestamp: DateTime<Utc>,
}
