//! Reference-context loading.
//!
//! The assembler reads fixed reference documents (coding rules, deprecated
//! API lists, project background) and prepares them for safe template
//! embedding: every `{` and `}` in the source text is doubled so literal
//! braces are never mistaken for live substitution variables downstream.
//!
//! Loads are cached per assembler instance; a pipeline run reads each
//! resource from disk at most once.

use appforge_core::error::ContextError;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::debug;

/// Loads and escapes named reference documents from a directory.
pub struct ContextAssembler {
    dir: PathBuf,
    cache: Mutex<HashMap<String, String>>,
}

impl ContextAssembler {
    /// Create an assembler rooted at the given context directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Load `<dir>/<name>.txt`, escaped for template embedding.
    ///
    /// Fails with [`ContextError::MissingResource`] if the file is absent.
    pub fn load(&self, name: &str) -> Result<String, ContextError> {
        if let Some(cached) = self.cache.lock().expect("context cache poisoned").get(name) {
            return Ok(cached.clone());
        }

        let path = self.dir.join(format!("{name}.txt"));
        let raw = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ContextError::MissingResource {
                    name: name.to_string(),
                    path: path.display().to_string(),
                });
            }
            Err(e) => {
                return Err(ContextError::Read {
                    name: name.to_string(),
                    reason: e.to_string(),
                });
            }
        };

        let escaped = escape_braces(&raw);
        debug!(name, bytes = escaped.len(), "Loaded context resource");
        self.cache
            .lock()
            .expect("context cache poisoned")
            .insert(name.to_string(), escaped.clone());
        Ok(escaped)
    }

    /// Load several resources at once, keyed by name.
    pub fn load_all(&self, names: &[&str]) -> Result<HashMap<String, String>, ContextError> {
        let mut out = HashMap::with_capacity(names.len());
        for name in names {
            out.insert((*name).to_string(), self.load(name)?);
        }
        Ok(out)
    }
}

/// Double every brace so the text survives template parsing as literals.
pub fn escape_braces(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '{' => out.push_str("{{"),
            '}' => out.push_str("}}"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::PromptTemplate;

    #[test]
    fn load_escapes_braces() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rules.txt"), "use Vec<{T}> not {T}[]").unwrap();

        let assembler = ContextAssembler::new(dir.path());
        let loaded = assembler.load("rules").unwrap();
        assert_eq!(loaded, "use Vec<{{T}}> not {{T}}[]");
    }

    #[test]
    fn missing_resource_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let assembler = ContextAssembler::new(dir.path());
        let err = assembler.load("absent").unwrap_err();
        match err {
            ContextError::MissingResource { name, .. } => assert_eq!(name, "absent"),
            other => panic!("expected MissingResource, got {other}"),
        }
    }

    #[test]
    fn load_is_cached_per_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("context.txt");
        std::fs::write(&path, "first").unwrap();

        let assembler = ContextAssembler::new(dir.path());
        assert_eq!(assembler.load("context").unwrap(), "first");

        // A disk change after the first load is not observed within the run.
        std::fs::write(&path, "second").unwrap();
        assert_eq!(assembler.load("context").unwrap(), "first");
    }

    #[test]
    fn escaping_round_trips_through_template_embedding() {
        let dir = tempfile::tempdir().unwrap();
        let original = "fn main() { let x = vec!{1, 2}; }";
        std::fs::write(dir.path().join("snippet.txt"), original).unwrap();

        let assembler = ContextAssembler::new(dir.path());
        let escaped = assembler.load("snippet").unwrap();

        // Doubled in the loaded form…
        assert_eq!(escaped.matches("{{").count(), 2);
        assert_eq!(escaped.matches("}}").count(), 2);

        // …and back to the single-character original after rendering.
        let tpl = PromptTemplate::parse("{context}")
            .unwrap()
            .partial("context", &escaped)
            .unwrap();
        let rendered = tpl.render(&HashMap::new()).unwrap();
        assert_eq!(rendered, original);
    }
}
