//! The materialization agent loop.
//!
//! Each iteration asks the capability — armed with the tool definitions —
//! to either invoke one tool or declare completion. Tool outcomes, including
//! failures, are appended to the transcript as text for the next iteration
//! to reason over; they never surface to the caller as faults. The loop
//! terminates on completion, or with `IterationBudgetExceeded` once the
//! budget is spent. Capability-level failures abort the run and trigger the
//! outer whole-run retry.
//!
//! State machine per run:
//! `Running → {ToolInvoked → Running}* → {Completed | BudgetExceeded | CapabilityFailure}`

use crate::session::SessionStore;
use appforge_core::error::{AgentError, Error};
use appforge_core::message::{Message, MessageToolCall, Session, SessionId};
use appforge_core::provider::{Provider, ProviderRequest};
use appforge_core::schema::CodebaseTree;
use appforge_core::tool::{ToolCall, ToolRegistry};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What the model decided to do with its turn.
#[derive(Debug)]
pub enum Decision {
    /// Invoke one declared tool. Arguments are still the raw JSON string;
    /// they are parsed at execution time so a malformed payload can be fed
    /// back to the model as a specific error.
    ToolCall(MessageToolCall),
    /// Declare the materialization finished.
    Completion { summary: String },
}

impl Decision {
    /// Decode a provider reply into a decision.
    ///
    /// The contract is one tool per iteration; if the model requested
    /// several, the first is executed and the extras are returned so the
    /// loop can report them back as skipped.
    fn decode(message: &Message) -> (Self, Vec<MessageToolCall>) {
        let mut calls = message.tool_calls.iter();
        match calls.next() {
            Some(tc) => (Decision::ToolCall(tc.clone()), calls.cloned().collect()),
            None => (
                Decision::Completion {
                    summary: message.content.clone(),
                },
                Vec::new(),
            ),
        }
    }
}

/// Parse a tool call's raw argument string. An empty string means no
/// arguments; anything else must be valid JSON.
fn parse_arguments(raw: &str) -> Result<serde_json::Value, serde_json::Error> {
    if raw.trim().is_empty() {
        return Ok(serde_json::json!({}));
    }
    serde_json::from_str(raw)
}

/// The result of a completed agent run.
#[derive(Debug)]
pub struct AgentOutcome {
    /// The model's completion summary.
    pub summary: String,

    /// Iterations consumed by this run.
    pub iterations: u32,

    /// Tool invocations made by this run.
    pub tool_calls_made: u32,
}

/// Drives the tool-using loop that turns instructions into file-system
/// effects.
pub struct MaterializationAgent {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    tools: Arc<ToolRegistry>,
    sessions: Arc<SessionStore>,
    system_prompt: String,
    max_iterations: u32,
    retry_number: u32,
}

impl MaterializationAgent {
    pub fn new(
        provider: Arc<dyn Provider>,
        model: impl Into<String>,
        tools: Arc<ToolRegistry>,
        sessions: Arc<SessionStore>,
        system_prompt: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
            tools,
            sessions,
            system_prompt: system_prompt.into(),
            max_iterations: 50,
            retry_number: 3,
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

    /// Set the iteration budget `I`.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the whole-run retry count on capability failure.
    pub fn with_retry_number(mut self, retries: u32) -> Self {
        self.retry_number = retries;
        self
    }

    /// Materialize a validated tree: the instruction is its pretty JSON.
    pub async fn run_tree(
        &self,
        session_id: &SessionId,
        tree: &CodebaseTree,
    ) -> Result<AgentOutcome, Error> {
        let instruction = serde_json::to_string_pretty(tree)?;
        self.run(session_id, &instruction).await
    }

    /// Run the agent loop for one instruction under the given session.
    ///
    /// The instruction is appended once; on a capability failure the whole
    /// run is retried (up to `retry_number` attempts total) against the
    /// same transcript. Tool effects from failed attempts are not rolled
    /// back — there is no transaction boundary around the tool layer.
    pub async fn run(
        &self,
        session_id: &SessionId,
        instruction: &str,
    ) -> Result<AgentOutcome, Error> {
        let mut session = self.sessions.load_or_create(session_id).await?;

        if session.is_empty() {
            session.push(Message::system(&self.system_prompt));
        }
        session.push(Message::user(instruction));
        self.sessions.save(&session).await?;

        let mut last_error = None;
        for attempt in 1..=self.retry_number {
            info!(session = %session_id, attempt, total = self.retry_number, "Starting agent run");

            match self.run_once(&mut session).await {
                Ok(outcome) => return Ok(outcome),
                Err(Error::Provider(e)) => {
                    warn!(session = %session_id, attempt, error = %e, "Capability failure, retrying agent run");
                    last_error = Some(Error::Provider(e));
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| Error::Internal("agent retry loop ran zero attempts".into())))
    }

    async fn run_once(&self, session: &mut Session) -> Result<AgentOutcome, Error> {
        let tool_definitions = self.tools.definitions();
        let mut iterations = 0u32;
        let mut tool_calls_made = 0u32;

        while iterations < self.max_iterations {
            iterations += 1;
            session.iterations += 1;

            debug!(session = %session.id, iteration = iterations, "Agent loop iteration");

            let request = ProviderRequest {
                model: self.model.clone(),
                messages: session.messages.clone(),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                tools: tool_definitions.clone(),
                stop: vec![],
            };

            let response = self.provider.complete(request).await?;
            let (decision, skipped) = Decision::decode(&response.message);
            session.push(response.message);

            match decision {
                Decision::Completion { summary } => {
                    self.sessions.save(session).await?;
                    info!(
                        session = %session.id,
                        iterations,
                        tool_calls = tool_calls_made,
                        "Agent declared completion"
                    );
                    return Ok(AgentOutcome {
                        summary,
                        iterations,
                        tool_calls_made,
                    });
                }
                Decision::ToolCall(call) => {
                    tool_calls_made += 1;
                    debug!(session = %session.id, tool = %call.name, "Executing tool call");

                    // Tool outcomes are data for the model, not faults for
                    // the caller. That includes an argument payload that
                    // isn't valid JSON.
                    let feedback = match parse_arguments(&call.arguments) {
                        Ok(arguments) => {
                            let invocation = ToolCall {
                                id: call.id.clone(),
                                name: call.name.clone(),
                                arguments,
                            };
                            match self.tools.execute(&invocation).await {
                                Ok(result) => result.output,
                                Err(e) => {
                                    warn!(session = %session.id, tool = %call.name, error = %e, "Tool call failed");
                                    format!("Error: {e}")
                                }
                            }
                        }
                        Err(e) => {
                            warn!(session = %session.id, tool = %call.name, error = %e, "Tool call arguments are not valid JSON");
                            format!("Error: malformed arguments JSON: {e}")
                        }
                    };
                    session.push(Message::tool_result(&call.id, feedback));

                    for extra in &skipped {
                        session.push(Message::tool_result(
                            &extra.id,
                            "Skipped: invoke exactly one tool per step.",
                        ));
                    }

                    self.sessions.save(session).await?;
                }
            }
        }

        self.sessions.save(session).await?;
        Err(AgentError::IterationBudgetExceeded {
            budget: self.max_iterations,
            session: session.id.to_string(),
        }
        .into())
    }
}
