//! Persisted session transcripts — one JSON file per session id.
//!
//! The store is explicit state passed by reference to the agent loop; there
//! is no process-wide global. Sessions are loaded from disk on first access
//! and flushed on every save, so repeated invocations under the same
//! identifier resume the same transcript.

use appforge_core::error::AgentError;
use appforge_core::message::{Session, SessionId};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// A file-backed store of agent sessions keyed by session id.
pub struct SessionStore {
    dir: PathBuf,
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    /// Create a store rooted at the given directory. The directory is
    /// created on first save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    fn path_for(&self, id: &SessionId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Session ids become file names; separators would escape the store.
    fn check_id(id: &SessionId) -> Result<(), AgentError> {
        if id.0.is_empty() || id.0.contains(['/', '\\']) || id.0.contains("..") {
            return Err(AgentError::SessionStore(format!(
                "invalid session id '{id}'"
            )));
        }
        Ok(())
    }

    /// Fetch the session for this id, falling back to disk, then to a fresh
    /// empty session.
    pub async fn load_or_create(&self, id: &SessionId) -> Result<Session, AgentError> {
        Self::check_id(id)?;

        if let Some(session) = self.sessions.read().await.get(&id.0) {
            return Ok(session.clone());
        }

        let path = self.path_for(id);
        let session = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Session>(&content) {
                Ok(session) => {
                    debug!(session = %id, messages = session.messages.len(), "Resumed session from disk");
                    session
                }
                Err(e) => {
                    warn!(session = %id, error = %e, "Corrupt session file, starting fresh");
                    Session::new(id.clone())
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Session::new(id.clone()),
            Err(e) => {
                return Err(AgentError::SessionStore(format!(
                    "failed to read session '{id}': {e}"
                )));
            }
        };

        self.sessions
            .write()
            .await
            .insert(id.0.clone(), session.clone());
        Ok(session)
    }

    /// Persist a session to memory and disk.
    pub async fn save(&self, session: &Session) -> Result<(), AgentError> {
        Self::check_id(&session.id)?;

        std::fs::create_dir_all(&self.dir).map_err(|e| {
            AgentError::SessionStore(format!("failed to create sessions directory: {e}"))
        })?;

        let json = serde_json::to_string_pretty(session).map_err(|e| {
            AgentError::SessionStore(format!("failed to serialize session '{}': {e}", session.id))
        })?;

        std::fs::write(self.path_for(&session.id), json).map_err(|e| {
            AgentError::SessionStore(format!("failed to write session '{}': {e}", session.id))
        })?;

        self.sessions
            .write()
            .await
            .insert(session.id.0.clone(), session.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use appforge_core::message::Message;

    #[tokio::test]
    async fn unknown_id_creates_empty_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        let session = store
            .load_or_create(&SessionId::from("fresh"))
            .await
            .unwrap();
        assert!(session.is_empty());
        assert_eq!(session.iterations, 0);
    }

    #[tokio::test]
    async fn save_then_resume_from_a_new_store_instance() {
        let dir = tempfile::tempdir().unwrap();
        let id = SessionId::from("codegen-1");

        {
            let store = SessionStore::new(dir.path());
            let mut session = store.load_or_create(&id).await.unwrap();
            session.push(Message::user("build the app"));
            session.iterations = 7;
            store.save(&session).await.unwrap();
        }

        // A brand-new store over the same directory sees the transcript.
        let store = SessionStore::new(dir.path());
        let resumed = store.load_or_create(&id).await.unwrap();
        assert_eq!(resumed.messages.len(), 1);
        assert_eq!(resumed.messages[0].content, "build the app");
        assert_eq!(resumed.iterations, 7);
    }

    #[tokio::test]
    async fn corrupt_session_file_starts_fresh() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), "not json at all").unwrap();

        let store = SessionStore::new(dir.path());
        let session = store.load_or_create(&SessionId::from("bad")).await.unwrap();
        assert!(session.is_empty());
    }

    #[tokio::test]
    async fn path_escaping_ids_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::new(dir.path());

        for bad in ["../sneaky", "a/b", "a\\b", ""] {
            let err = store
                .load_or_create(&SessionId::from(bad))
                .await
                .unwrap_err();
            assert!(matches!(err, AgentError::SessionStore(_)), "id {bad:?}");
        }
    }
}
