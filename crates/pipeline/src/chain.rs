//! The stage chain executor.
//!
//! Runs an ordered sequence of (render, generate, persist) stages. Each
//! stage's completion is durably persisted before the next stage starts and
//! becomes a substitution input for every later stage. Dependency wiring is
//! checked when a stage is added: referencing a stage that runs later (or
//! never) is a construction-time error, not a runtime one.
//!
//! There is no retry at this layer — a capability failure at stage *k*
//! aborts the whole chain.

use crate::stage::{DESCRIPTION_INPUT, GenerationStage, StageResult};
use crate::store::DocumentStore;
use appforge_core::error::{Error, StageError};
use appforge_core::provider::{Provider, ProviderRequest};
use appforge_context::PromptTemplate;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// An ordered, validated chain of generation stages.
pub struct StageChain {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    store: DocumentStore,
    fixed_context: HashMap<String, String>,
    stages: Vec<GenerationStage>,
}

/// All outputs of a completed chain run, in execution order.
#[derive(Debug)]
pub struct ChainOutput {
    /// Per-stage results, in execution order
    pub results: Vec<StageResult>,
}

impl ChainOutput {
    /// The final stage's raw output.
    pub fn final_output(&self) -> &str {
        self.results
            .last()
            .map(|r| r.output.as_str())
            .unwrap_or_default()
    }

    /// Look up one stage's output by id.
    pub fn output(&self, stage_id: &str) -> Option<&str> {
        self.results
            .iter()
            .find(|r| r.stage == stage_id)
            .map(|r| r.output.as_str())
    }
}

impl StageChain {
    /// Create an empty chain.
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>, store: DocumentStore) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
            store,
            fixed_context: HashMap::new(),
            stages: Vec::new(),
        }
    }

    /// Set the generation temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the per-completion token cap.
    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Bind fixed context values (already escaped by the assembler).
    ///
    /// Must be called before stages are added: each stage's fixed-context
    /// variables are embedded into its template at the moment the stage is
    /// added to the chain.
    pub fn with_fixed_context(mut self, context: HashMap<String, String>) -> Self {
        self.fixed_context = context;
        self
    }

    /// Append a stage, validating its dependencies.
    ///
    /// Fixed-context variables are bound into the template here; every
    /// remaining variable must be the run description or the id of an
    /// earlier stage.
    pub fn stage(
        mut self,
        id: impl Into<String>,
        template: PromptTemplate,
        persist_key: impl Into<String>,
    ) -> Result<Self, Error> {
        let id = id.into();

        if self.stages.iter().any(|s| s.id == id) {
            return Err(StageError::DuplicateStage(id).into());
        }

        let mut template = template;
        for (name, value) in &self.fixed_context {
            if template.variables().contains(name) {
                template = template.partial(name, value)?;
            }
        }

        for dependency in template.variables() {
            let known = dependency == DESCRIPTION_INPUT
                || self.stages.iter().any(|s| s.id == dependency);
            if !known {
                return Err(StageError::UnknownDependency {
                    stage: id,
                    dependency,
                }
                .into());
            }
        }

        self.stages.push(GenerationStage {
            id,
            template,
            persist_key: persist_key.into(),
        });
        Ok(self)
    }

    /// Execute the chain sequentially from the given description.
    pub async fn run(&self, description: &str) -> Result<ChainOutput, Error> {
        if self.stages.is_empty() {
            return Err(Error::Internal("stage chain has no stages".into()));
        }

        let mut values: HashMap<String, String> = HashMap::new();
        values.insert(DESCRIPTION_INPUT.to_string(), description.to_string());

        let mut results = Vec::with_capacity(self.stages.len());

        for stage in &self.stages {
            debug!(stage = %stage.id, "Rendering stage prompt");
            let prompt = stage.template.render(&values)?;

            info!(stage = %stage.id, model = %self.model, "Running generation stage");
            let mut request = ProviderRequest::generation(&self.model, prompt, self.temperature);
            request.max_tokens = self.max_tokens;

            let response =
                self.provider
                    .complete(request)
                    .await
                    .map_err(|e| StageError::Generation {
                        stage: stage.id.clone(),
                        reason: e.to_string(),
                    })?;

            let output = response.message.content;
            self.store.save(&stage.persist_key, &output)?;

            values.insert(stage.id.clone(), output.clone());
            results.push(StageResult {
                stage: stage.id.clone(),
                output,
                timestamp: Utc::now(),
            });
        }

        Ok(ChainOutput { results })
    }
}
