//! Prompt template loading from disk.
//!
//! One template per file, `<dir>/<name>.txt`. Templates are parsed on load
//! so malformed delimiters fail before any generation happens.

use crate::template::PromptTemplate;
use appforge_core::error::{ContextError, Error};
use std::path::PathBuf;

/// Loads named prompt templates from a directory.
pub struct PromptLibrary {
    dir: PathBuf,
}

impl PromptLibrary {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Load and parse `<dir>/<name>.txt`.
    pub fn template(&self, name: &str) -> Result<PromptTemplate, Error> {
        let path = self.dir.join(format!("{name}.txt"));
        let source = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ContextError::MissingResource {
                    name: name.to_string(),
                    path: path.display().to_string(),
                }
                .into());
            }
            Err(e) => {
                return Err(ContextError::Read {
                    name: name.to_string(),
                    reason: e.to_string(),
                }
                .into());
            }
        };
        Ok(PromptTemplate::parse(&source)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_and_parses_template() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("greet.txt"), "Hello {name}!").unwrap();

        let library = PromptLibrary::new(dir.path());
        let tpl = library.template("greet").unwrap();
        assert!(tpl.variables().contains("name"));
    }

    #[test]
    fn missing_template_is_missing_resource() {
        let dir = tempfile::tempdir().unwrap();
        let library = PromptLibrary::new(dir.path());
        let err = library.template("absent").unwrap_err();
        assert!(matches!(
            err,
            Error::Context(ContextError::MissingResource { .. })
        ));
    }

    #[test]
    fn malformed_template_fails_on_load() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.txt"), "stray } brace").unwrap();

        let library = PromptLibrary::new(dir.path());
        assert!(matches!(
            library.template("bad").unwrap_err(),
            Error::Template(_)
        ));
    }
}
