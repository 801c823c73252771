//! Persisted session state.
//!
//! The session lives under two fixed keys, `token` (the opaque bearer token)
//! and `user` (the last-synced profile as JSON). [`SessionStore`] is the only
//! way components reach it; only the session manager writes.

use std::collections::BTreeMap;
use std::fmt::Debug;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use thiserror::Error;
use tracing::warn;

use crate::UserProfile;

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Key holding the JSON-encoded user profile.
pub const USER_KEY: &str = "user";

/// Errors persisting session state.
///
/// In-memory state is always updated before persisting, so a failed write
/// leaves the current process consistent.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Failed to persist session: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to encode session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Storage for the token and profile.
pub trait SessionStore: Send + Sync + Debug {
    fn token(&self) -> Option<String>;

    fn set_token(&self, token: &str) -> Result<(), StoreError>;

    /// The stored profile; `None` if absent or unreadable.
    fn profile(&self) -> Option<UserProfile>;

    fn set_profile(&self, profile: &UserProfile) -> Result<(), StoreError>;

    fn clear_profile(&self) -> Result<(), StoreError>;

    /// Remove token and profile.
    fn clear(&self) -> Result<(), StoreError>;
}

fn decode_profile(raw: Option<&String>) -> Option<UserProfile> {
    let raw = raw?;
    match serde_json::from_str(raw) {
        Ok(profile) => Some(profile),
        Err(e) => {
            warn!("Ignoring unreadable stored profile: {}", e);
            None
        }
    }
}

/// A process-local store. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a raw value, bypassing encoding. Useful to seed a store.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries.write().insert(key.to_string(), value.to_string());
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<String> {
        self.entries.read().get(TOKEN_KEY).cloned()
    }

    fn set_token(&self, token: &str) -> Result<(), StoreError> {
        self.insert_raw(TOKEN_KEY, token);
        Ok(())
    }

    fn profile(&self) -> Option<UserProfile> {
        decode_profile(self.entries.read().get(USER_KEY))
    }

    fn set_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let json = serde_json::to_string(profile)?;
        self.insert_raw(USER_KEY, &json);
        Ok(())
    }

    fn clear_profile(&self) -> Result<(), StoreError> {
        self.entries.write().remove(USER_KEY);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.entries.write();
        entries.remove(TOKEN_KEY);
        entries.remove(USER_KEY);
        Ok(())
    }
}

/// A store persisted as a small JSON object on disk.
///
/// The file is read once at open and rewritten after every change.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileSessionStore {
    /// Open the store at `path`. A missing or unreadable file starts empty.
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!("Session file {} is unreadable, starting empty: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("Failed to read session file {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };

        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn update<F>(&self, f: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let mut entries = self.entries.write();
        f(&mut entries);
        let json = serde_json::to_string_pretty(&*entries)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Option<String> {
        self.entries.read().get(TOKEN_KEY).cloned()
    }

    fn set_token(&self, token: &str) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.insert(TOKEN_KEY.to_string(), token.to_string());
        })
    }

    fn profile(&self) -> Option<UserProfile> {
        decode_profile(self.entries.read().get(USER_KEY))
    }

    fn set_profile(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let json = serde_json::to_string(profile)?;
        self.update(|entries| {
            entries.insert(USER_KEY.to_string(), json);
        })
    }

    fn clear_profile(&self) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(USER_KEY);
        })
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.update(|entries| {
            entries.remove(TOKEN_KEY);
            entries.remove(USER_KEY);
        })
    }
}
