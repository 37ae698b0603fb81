//! Storage
//!
//! Key/value port standing in for per-profile browser storage. Stores keep
//! their state in a versioned envelope (`{"state": ..., "version": 0}`) under
//! a fixed key and write it through on every mutation.

use std::{
    cell::RefCell,
    fs,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    rc::Rc,
};

#[cfg(test)]
use mockall::automock;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, warn};

/// Envelope version written alongside persisted state.
pub const SNAPSHOT_VERSION: u32 = 0;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key is empty or contains path separators.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// Reading or writing the backing file failed.
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// State could not be encoded as JSON.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable key/value storage.
#[cfg_attr(test, automock)]
pub trait Storage {
    /// Read the raw value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn save(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`. Missing keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// In-memory storage. Clones share the same entries.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Rc<RefCell<FxHashMap<String, String>>>,
}

impl MemoryStorage {
    /// Create empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create storage pre-populated with a single entry.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();

        storage.entries.borrow_mut().insert(key.into(), value.into());

        storage
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl Storage for MemoryStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.borrow_mut().remove(key);

        Ok(())
    }
}

/// File-backed storage keeping one `<key>.json` file per key in a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Use `dir` as the storage directory. It is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The storage directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let invalid = key.is_empty()
            || key.starts_with('.')
            || key.contains(['/', '\\', '\0']);

        if invalid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }

        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl Storage for FileStorage {
    fn load(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key)?;

        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        fs::create_dir_all(&self.dir)?;

        // Write beside the target and rename over it so readers never see a
        // partial snapshot.
        let mut file = NamedTempFile::new_in(&self.dir)?;
        file.write_all(value.as_bytes())?;
        file.persist(&path).map_err(|err| err.error)?;

        debug!(path = %path.display(), "wrote snapshot");

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.path_for(key)?;

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Persisted envelope around a store's state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<T> {
    /// The persisted state.
    pub state: Option<T>,

    /// Envelope version.
    #[serde(default)]
    pub version: u32,
}

impl<T> Snapshot<T> {
    /// Wrap `state` at the current version.
    pub fn new(state: T) -> Self {
        Self {
            state: Some(state),
            version: SNAPSHOT_VERSION,
        }
    }
}

/// Decode a raw snapshot, yielding `None` if it cannot be parsed.
pub fn decode_state<T: DeserializeOwned>(raw: &str) -> Option<T> {
    match serde_json::from_str::<Snapshot<T>>(raw) {
        Ok(snapshot) => snapshot.state,
        Err(err) => {
            warn!(error = %err, "discarding unparsable snapshot");

            None
        }
    }
}

/// Load the state stored under `key`, falling back to `T::default()` when it
/// is missing, unreadable or corrupt.
pub fn load_state<T, S>(storage: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: Storage + ?Sized,
{
    let raw = match storage.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(err) => {
            warn!(key, error = %err, "failed to read snapshot");

            return T::default();
        }
    };

    decode_state(&raw).unwrap_or_default()
}

/// Encode `state` in a snapshot envelope and write it under `key`.
///
/// # Errors
///
/// Returns a [`StorageError`] if encoding or writing fails.
pub fn save_state<T, S>(storage: &S, key: &str, state: &T) -> Result<(), StorageError>
where
    T: Serialize,
    S: Storage + ?Sized,
{
    let raw = serde_json::to_string(&Snapshot::new(state))?;

    storage.save(key, &raw)
}

/// Deserialize a value treating an explicit `null` as the default.
///
/// # Errors
///
/// Returns the deserializer's error if the value is neither `null` nor a `T`.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}
