// ── Session store ──
//
// Authenticated identity plus enabled modules, persisted as JSON so a
// restart keeps the user logged in. An absent, empty (`{}`) or unreadable
// file is the unauthenticated state. The session is trusted as-is once
// written: no refresh, expiry or revalidation.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use opsdeck_api::{Identity, Module};

use crate::error::CoreError;

/// A logged-in session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub name: String,
    pub initials: String,
    pub email: String,
    #[serde(default)]
    pub modules: Vec<Module>,
}

impl Session {
    pub fn new(token: String, identity: Identity) -> Self {
        Self {
            token,
            name: identity.name,
            initials: identity.initials,
            email: identity.email,
            modules: identity.modules,
        }
    }

    pub fn has_module(&self, module: Module) -> bool {
        self.modules.contains(&module)
    }
}

/// File-backed session with change notification.
pub struct SessionStore {
    path: PathBuf,
    current: watch::Sender<Option<Session>>,
}

impl SessionStore {
    /// Open the store at `path`, loading whatever session it holds.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let loaded = load(&path);
        debug!(path = %path.display(), authenticated = loaded.is_some(), "session loaded");
        let (current, _) = watch::channel(loaded);
        Self { path, current }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn current(&self) -> Option<Session> {
        self.current.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    pub fn has_module(&self, module: Module) -> bool {
        self.current
            .borrow()
            .as_ref()
            .is_some_and(|s| s.has_module(module))
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.current.subscribe()
    }

    /// Persist and publish a new session.
    pub fn set(&self, session: Session) -> Result<(), CoreError> {
        let json = serde_json::to_string_pretty(&session).map_err(|e| CoreError::Session {
            message: e.to_string(),
        })?;
        write_atomic(&self.path, &json)?;
        info!(email = %session.email, "session stored");
        self.current.send_replace(Some(session));
        Ok(())
    }

    /// Reset to the empty session. Idempotent.
    pub fn clear(&self) -> Result<(), CoreError> {
        write_atomic(&self.path, "{}")?;
        if self.current.send_replace(None).is_some() {
            info!("session cleared");
        }
        Ok(())
    }
}

fn load(path: &Path) -> Option<Session> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read session file");
            return None;
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(v) => v,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "session file is not JSON, ignoring");
            return None;
        }
    };

    if value.as_object().is_some_and(serde_json::Map::is_empty) {
        return None;
    }

    serde_json::from_value(value)
        .inspect_err(|e| warn!(error = %e, "session file has unexpected shape, ignoring"))
        .ok()
}

/// Write via a sibling temp file so a crash never leaves half a session.
fn write_atomic(path: &Path, contents: &str) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, contents)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session() -> Session {
        Session::new(
            "tok".into(),
            Identity {
                name: "Olive Ops".into(),
                initials: "OO".into(),
                email: "olive@opsdeck.dev".into(),
                modules: vec![Module::Scheduler],
            },
        )
    }

    #[test]
    fn missing_file_is_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("session.json"));
        assert!(!store.is_authenticated());
    }

    #[test]
    fn set_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        SessionStore::open(&path).set(session()).unwrap();

        let reopened = SessionStore::open(&path);
        assert_eq!(reopened.current(), Some(session()));
        assert!(reopened.has_module(Module::Scheduler));
        assert!(!reopened.has_module(Module::UserManagement));
    }

    #[test]
    fn clear_writes_empty_object() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = SessionStore::open(&path);
        store.set(session()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();

        assert!(!store.is_authenticated());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
        assert!(!SessionStore::open(&path).is_authenticated());
    }

    #[test]
    fn corrupt_file_is_unauthenticated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "{\"token\": 42").unwrap();
        assert!(!SessionStore::open(&path).is_authenticated());

        std::fs::write(&path, "{\"token\": \"x\"}").unwrap();
        assert!(!SessionStore::open(&path).is_authenticated());
    }

    #[test]
    fn subscribers_see_logout() {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open(dir.path().join("session.json"));
        let mut rx = store.subscribe();
        store.set(session()).unwrap();
        assert!(rx.borrow_and_update().is_some());
        store.clear().unwrap();
        assert!(rx.has_changed().unwrap());
        assert!(rx.borrow_and_update().is_none());
    }
}
