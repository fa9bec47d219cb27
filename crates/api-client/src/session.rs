//! Session and credential storage.
//!
//! The bearer token lives in an explicit [`Session`] handed to the client at construction,
//! rather than in process-wide state. The session delegates persistence to a
//! [`CredentialStore`]:
//! - [`MemoryCredentialStore`] keeps the token for the lifetime of the process
//! - [`FileCredentialStore`] persists it as `{"token": "..."}` in a single file
//!
//! The client reads the token right before every dispatch and clears it when the backend
//! answers 401.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Key under which the token is stored.
pub const TOKEN_KEY: &str = "token";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to read credential file: {0}")]
    Read(std::io::Error),
    #[error("failed to write credential file: {0}")]
    Write(std::io::Error),
    #[error("failed to remove credential file: {0}")]
    Remove(std::io::Error),
    #[error("credential file is malformed: {0}")]
    Malformed(serde_json::Error),
    #[error("failed to serialize credentials: {0}")]
    Serialization(serde_json::Error),
    #[error("credential store lock was poisoned")]
    Poisoned,
}

/// Persistence for a single bearer token.
pub trait CredentialStore: Send + Sync {
    /// The stored token, or `None` when nothing is stored.
    fn load(&self) -> Result<Option<String>, StoreError>;

    fn save(&self, token: &str) -> Result<(), StoreError>;

    /// Remove the token. Clearing an empty store is not an error.
    fn clear(&self) -> Result<(), StoreError>;
}

/// In-process token storage.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        let guard = self.token.read().map_err(|_| StoreError::Poisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        let mut guard = self.token.write().map_err(|_| StoreError::Poisoned)?;
        *guard = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self.token.write().map_err(|_| StoreError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredCredentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// Token persisted in a JSON file. A missing file means no token is stored.
#[derive(Clone, Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(StoreError::Read(err)),
        };

        let stored: StoredCredentials =
            serde_json::from_str(&contents).map_err(StoreError::Malformed)?;
        Ok(stored.token)
    }

    fn save(&self, token: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(StoreError::Write)?;
        }

        let stored = StoredCredentials {
            token: Some(token.to_owned()),
        };
        let json = serde_json::to_string_pretty(&stored).map_err(StoreError::Serialization)?;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path).map_err(StoreError::Write)?;

        // `mode` only applies on creation; tighten a pre-existing file before writing.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))
                .map_err(StoreError::Write)?;
        }

        file.write_all(json.as_bytes()).map_err(StoreError::Write)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StoreError::Remove(err)),
        }
    }
}

/// The authenticated state shared by a client and its callers.
pub struct Session {
    store: Box<dyn CredentialStore>,
}

impl Session {
    pub fn new(store: impl CredentialStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// A session backed by [`MemoryCredentialStore`].
    pub fn in_memory() -> Self {
        Self::new(MemoryCredentialStore::new())
    }

    /// Current bearer token. Blank stored values count as no token.
    pub fn token(&self) -> Result<Option<String>, StoreError> {
        Ok(self.store.load()?.filter(|token| !token.trim().is_empty()))
    }

    pub fn set_token(&self, token: &str) -> Result<(), StoreError> {
        self.store.save(token)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.store.clear()
    }

    /// Whether a token is currently stored. Store failures read as signed out.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.token(), Ok(Some(_)))
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::in_memory()
    }
}
