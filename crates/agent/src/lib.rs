//! The tool-using materialization loop.
//!
//! Takes a validated codebase tree (or any free-form instruction), a tool
//! registry, and a session store, and drives the iterate-until-done loop
//! that turns the plan into files on disk. Runs under the same session id
//! resume the same persisted transcript.

pub mod loop_runner;
pub mod session;

pub use loop_runner::{AgentOutcome, Decision, MaterializationAgent};
pub use session::SessionStore;
