//! Reference-context assembly and prompt templating for appforge.
//!
//! Pure, cached, side-effect-free aside from file reads. Everything the
//! pipeline interpolates into a prompt flows through this crate, so the
//! escape discipline lives in exactly one place.

pub mod assembler;
pub mod library;
pub mod template;

pub use assembler::{ContextAssembler, escape_braces};
pub use library::PromptLibrary;
pub use template::PromptTemplate;
