//! Durable stage-output store — one text document per stage key.
//!
//! Re-running a stage overwrites its document in place; there is no
//! versioning. The directory is created on first write.

use appforge_core::error::StageError;
use std::path::PathBuf;
use tracing::debug;

/// Stores stage outputs as `<dir>/<key>.txt`.
pub struct DocumentStore {
    dir: PathBuf,
}

impl DocumentStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.txt"))
    }

    /// Persist a document under the given key (create-or-overwrite).
    pub fn save(&self, key: &str, text: &str) -> Result<(), StageError> {
        std::fs::create_dir_all(&self.dir).map_err(|e| StageError::Persist {
            key: key.to_string(),
            reason: format!("failed to create documents directory: {e}"),
        })?;

        let path = self.path_for(key);
        std::fs::write(&path, text).map_err(|e| StageError::Persist {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        debug!(key, bytes = text.len(), "Persisted stage document");
        Ok(())
    }

    /// Load the document stored under the given key.
    pub fn load(&self, key: &str) -> Result<String, StageError> {
        let path = self.path_for(key);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StageError::MissingDocument {
                    key: key.to_string(),
                })
            }
            Err(e) => Err(StageError::Persist {
                key: key.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}
