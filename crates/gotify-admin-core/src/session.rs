//! Persisted login session.
//!
//! The session is two string entries in a key/value storage: the client token
//! and the client identity as JSON. [`SessionStore`] is constructed once and
//! shared with the request client through an `Arc`.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Storage key of the session token.
pub const TOKEN_KEY: &str = "gotify-token";
/// Storage key of the client identity.
pub const CLIENT_KEY: &str = "gotify-client";

/// Session persistence failures.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Identity of the client created at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientIdentity {
    pub id: u64,
    pub name: String,
}

/// String key/value storage backing a session.
///
/// Reads never fail: unreadable storage is treated as empty.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Storage kept in a JSON object on disk, re-read on every access.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.gotify-admin/session.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".gotify-admin").join("session.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> BTreeMap<String, String> {
        let Ok(raw) = std::fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Ignoring unreadable session file");
            BTreeMap::new()
        })
    }

    fn write_map(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(map)?)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.read_map().remove(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut map = self.read_map();
        map.insert(key.to_string(), value.to_string());
        self.write_map(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut map = self.read_map();
        if map.remove(key).is_some() {
            self.write_map(&map)?;
        }
        Ok(())
    }
}

/// Process-local storage.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// The operator's session: token plus client identity.
pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        Self {
            storage: Box::new(storage),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::default())
    }

    /// Store a freshly issued token and its client identity.
    pub fn persist(&self, token: &str, client: &ClientIdentity) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, token)?;
        self.storage.set(CLIENT_KEY, &serde_json::to_string(client)?)
    }

    /// Forget the session entirely.
    pub fn logout(&self) -> Result<(), StorageError> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(CLIENT_KEY)
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn token(&self) -> Option<String> {
        self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn client(&self) -> Option<ClientIdentity> {
        self.storage
            .get(CLIENT_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }
}
