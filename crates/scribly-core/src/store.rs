// ── Durable session storage ──
//
// Two slots survive restarts: the raw bearer credential and the serialized
// identity snapshot. `CredentialStore` is the typed view over any
// `KeyValueStore`; only `SessionState` holds one.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use scribly_api::Identity;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::error::StoreError;

/// Slot holding the bearer credential.
pub const TOKEN_KEY: &str = "token";
/// Slot holding the identity snapshot as JSON.
pub const IDENTITY_KEY: &str = "userInfo";

/// Durable string key/value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Apply every change as one step. `None` removes the key.
    fn write(&self, changes: &[(&str, Option<String>)]) -> Result<(), StoreError>;
}

// ── File-backed store ───────────────────────────────────────────────

/// A JSON object on disk.
///
/// Each write lands in a sibling temp file that is then renamed over the
/// original, so a batch is either fully visible or not at all.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt {
            path: self.path.clone(),
            message: e.to_string(),
        })
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn persist(&self, map: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }

        let json = serde_json::to_string_pretty(map)?;
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut file = open_private(&tmp).map_err(|e| self.io_err(e))?;
            file.write_all(json.as_bytes())
                .map_err(|e| self.io_err(e))?;
            file.sync_all().map_err(|e| self.io_err(e))?;
        }
        fs::rename(&tmp, &self.path).map_err(|e| self.io_err(e))?;
        debug!(path = %self.path.display(), keys = map.len(), "session file written");
        Ok(())
    }
}

#[cfg(unix)]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    use std::os::unix::fs::OpenOptionsExt;
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
}

#[cfg(not(unix))]
fn open_private(path: &Path) -> std::io::Result<fs::File> {
    fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_map()?.remove(key))
    }

    fn write(&self, changes: &[(&str, Option<String>)]) -> Result<(), StoreError> {
        let mut map = match self.read_map() {
            Ok(map) => map,
            // A write replaces the whole file, so a corrupt one is recoverable.
            Err(StoreError::Corrupt { path, message }) => {
                warn!(path = %path.display(), %message, "discarding corrupt session file");
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };

        for (key, value) in changes {
            match value {
                Some(value) => {
                    map.insert((*key).to_owned(), value.clone());
                }
                None => {
                    map.remove(*key);
                }
            }
        }
        self.persist(&map)
    }
}

// ── In-memory store ─────────────────────────────────────────────────

/// Process-local store. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with `entries`.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let map = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Arc::new(Mutex::new(map)),
        }
    }

    /// Copy of everything currently stored.
    pub fn entries(&self) -> BTreeMap<String, String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn write(&self, changes: &[(&str, Option<String>)]) -> Result<(), StoreError> {
        let mut map = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        for (key, value) in changes {
            match value {
                Some(value) => {
                    map.insert((*key).to_owned(), value.clone());
                }
                None => {
                    map.remove(*key);
                }
            }
        }
        Ok(())
    }
}

// ── Typed credential view ───────────────────────────────────────────

/// What was found in storage at startup.
#[derive(Debug, Default)]
pub struct Persisted {
    pub token: Option<SecretString>,
    pub identity: Option<Identity>,
}

/// Typed access to the credential and identity slots.
pub struct CredentialStore {
    backend: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore").finish_non_exhaustive()
    }
}

impl CredentialStore {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self { backend }
    }

    /// Read both slots. An unreadable identity is dropped with a warning;
    /// the credential still counts.
    ///
    /// Corrupt storage loads as anonymous and is reset, so login and logout
    /// keep working. Other failures (permissions, I/O) are returned.
    pub fn load(&self) -> Result<Persisted, StoreError> {
        match self.read_slots() {
            Err(StoreError::Corrupt { path, message }) => {
                warn!(path = %path.display(), %message, "session storage is corrupt, starting anonymous");
                if let Err(e) = self.clear() {
                    warn!(error = %e, "could not reset corrupt session storage");
                }
                Ok(Persisted::default())
            }
            other => other,
        }
    }

    fn read_slots(&self) -> Result<Persisted, StoreError> {
        let token = self
            .backend
            .get(TOKEN_KEY)?
            .filter(|t| !t.is_empty())
            .map(SecretString::from);

        let identity = match self.backend.get(IDENTITY_KEY)? {
            Some(raw) => match serde_json::from_str::<Identity>(&raw) {
                Ok(identity) => Some(identity),
                Err(e) => {
                    warn!(error = %e, "stored identity is unreadable, ignoring it");
                    None
                }
            },
            None => None,
        };

        Ok(Persisted { token, identity })
    }

    /// Write credential and identity as one batch.
    pub fn save(&self, token: &SecretString, identity: &Identity) -> Result<(), StoreError> {
        let identity = serde_json::to_string(identity)?;
        self.backend.write(&[
            (TOKEN_KEY, Some(token.expose_secret().to_owned())),
            (IDENTITY_KEY, Some(identity)),
        ])
    }

    pub fn save_identity(&self, identity: &Identity) -> Result<(), StoreError> {
        let identity = serde_json::to_string(identity)?;
        self.backend.write(&[(IDENTITY_KEY, Some(identity))])
    }

    /// Remove both slots as one batch.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.backend
            .write(&[(TOKEN_KEY, None), (IDENTITY_KEY, None)])
    }
}
