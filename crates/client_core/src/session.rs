//! Session state: the `token` / `userRole` key-value pair the dashboard reads
//! before privileged actions, and the snapshot handed to controllers.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use shared::domain::ViewerRole;
use thiserror::Error;

pub const TOKEN_KEY: &str = "token";
pub const ROLE_KEY: &str = "userRole";

const SESSION_DIR_NAME: &str = "clinic-dashboard";
const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("failed to access session file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("session file {path} is not a json object: {source}")]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("no platform data directory available for the session file")]
    NoDataDir,
    #[error("session store lock poisoned")]
    Poisoned,
}

/// Plain key-value session storage.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

#[derive(Default)]
pub struct MemorySessionStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let entries = self.entries.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().map_err(|_| SessionError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().map_err(|_| SessionError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// JSON object on disk. Every read goes back to the file so a token written
/// by another process is picked up at the next action.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_path() -> Result<PathBuf, SessionError> {
        let data_dir = dirs::data_dir().ok_or(SessionError::NoDataDir)?;
        Ok(data_dir.join(SESSION_DIR_NAME).join(SESSION_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<HashMap<String, String>, SessionError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(HashMap::new()),
            Err(source) => {
                return Err(SessionError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        serde_json::from_str(&raw).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    fn write_entries(&self, entries: &HashMap<String, String>) -> Result<(), SessionError> {
        let io_err = |source| SessionError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let raw = serde_json::to_string_pretty(entries).map_err(|source| SessionError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, raw).map_err(io_err)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        let mut entries = self.read_entries()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.read_entries()?;
        if entries.remove(key).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

/// Token and role captured at one point in time and injected into the
/// renderers and controllers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionContext {
    token: Option<String>,
    role: Option<ViewerRole>,
}

impl SessionContext {
    pub fn new(token: Option<String>, role: Option<ViewerRole>) -> Self {
        Self {
            token: token.filter(|token| !token.trim().is_empty()),
            role,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn load(store: &dyn SessionStore) -> Result<Self, SessionError> {
        let token = store.get(TOKEN_KEY)?;
        let role = store.get(ROLE_KEY)?.map(|tag| ViewerRole::from_tag(&tag));
        Ok(Self::new(token, role))
    }

    pub fn save(&self, store: &dyn SessionStore) -> Result<(), SessionError> {
        match &self.token {
            Some(token) => store.set(TOKEN_KEY, token)?,
            None => store.remove(TOKEN_KEY)?,
        }
        match &self.role {
            Some(role) => store.set(ROLE_KEY, role.as_tag()),
            None => store.remove(ROLE_KEY),
        }
    }

    /// Non-empty token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn role(&self) -> Option<&ViewerRole> {
        self.role.as_ref()
    }

    pub fn with_role(mut self, role: ViewerRole) -> Self {
        self.role = Some(role);
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        self.token = (!token.trim().is_empty()).then_some(token);
        self
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
