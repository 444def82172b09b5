//! # appforge Core
//!
//! Domain types, traits, and error definitions for the appforge codebase
//! generator. The generation capability ([`Provider`]) and the file-system
//! operations ([`Tool`]) are traits here; their implementations live in
//! `appforge-providers` and `appforge-tools`, and every other crate depends
//! inward on this one. Test code swaps in mock implementations of the same
//! traits.

pub mod error;
pub mod message;
pub mod provider;
pub mod schema;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, Result};
pub use message::{Message, MessageToolCall, Role, Session, SessionId};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition, Usage};
pub use schema::{CodebaseTree, FileNode, FolderNode};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
