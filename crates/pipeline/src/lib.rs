//! The sequential generation pipeline.
//!
//! A chain of stages, each one rendering a prompt from the run description,
//! fixed reference context, and earlier stage outputs, invoking the
//! generation capability, and persisting the completion to a durable
//! per-stage document. Stage *k+1* never starts before stage *k*'s output
//! is on disk.

pub mod chain;
pub mod stage;
pub mod store;

pub use chain::{ChainOutput, StageChain};
pub use stage::{DESCRIPTION_INPUT, GenerationStage, StageResult};
pub use store::DocumentStore;
