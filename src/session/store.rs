//! Session Persistence
//!
//! Keeps the signed-in session on disk between runs as a small JSON file.

use std::path::{Path, PathBuf};

use super::{Session, SessionError};

/// File-backed session storage
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Store that never touches disk
    pub fn ephemeral() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Read the persisted session.
    ///
    /// A missing file is the logged-out state. A corrupt file is logged and
    /// treated the same way.
    pub fn load(&self) -> Option<Session> {
        let path = self.path.as_ref()?;

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read session file");
                return None;
            }
        };

        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable session file");
                None
            }
        }
    }

    /// Persist the session, creating parent directories as needed
    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| SessionError::Io {
                    path: parent.to_path_buf(),
                    error: e.to_string(),
                })?;
            }
        }

        let content = serde_json::to_string_pretty(session)
            .map_err(|e| SessionError::Encode(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| SessionError::Io {
            path: path.clone(),
            error: e.to_string(),
        })
    }

    /// Remove the persisted session. Removing nothing is fine.
    pub fn clear(&self) -> Result<(), SessionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(SessionError::Io {
                path: path.clone(),
                error: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::fake::student_session;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("nested").join("session.json"));

        assert!(store.load().is_none());

        let session = student_session();
        store.save(&session).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.token(), session.token());
        assert_eq!(loaded.user(), session.user());
    }

    #[test]
    fn test_corrupt_file_is_logged_out() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(SessionStore::new(&path).load().is_none());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = SessionStore::new(dir.path().join("session.json"));

        store.save(&student_session()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_ephemeral_store() {
        let store = SessionStore::ephemeral();
        store.save(&student_session()).unwrap();
        assert!(store.load().is_none());
        assert!(store.path().is_none());
    }
}
