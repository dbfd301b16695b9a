//! Key-value persistence boundary.
//!
//! The store is injected once per process; tests substitute `MemoryStore`
//! for the file-backed production store. The read path never fails — an
//! unreadable slot reads as absent, per the availability-over-correctness
//! policy of the pipeline.

pub mod slots;

pub use slots::*;

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Minimal key-value contract shared by all stores.
pub trait KeyValueStore {
    /// Returns the stored value, or `None` when the key is missing or the
    /// slot cannot be read.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores a value; returns whether the write took effect.
    fn set(&self, key: &str, value: &str) -> bool;

    /// Removes a key; returns whether the key is absent afterwards.
    fn remove(&self, key: &str) -> bool;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn remove(&self, key: &str) -> bool {
        self.entries.lock().unwrap().remove(key);
        true
    }
}

/// File-backed store — one JSON document per key under the app data dir.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Store under the default app data directory.
    pub fn open_default() -> Result<Self, StorageError> {
        Self::open(crate::config::store_dir())
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "Slot read failed, treating as absent");
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> bool {
        match fs::write(self.path_for(key), value) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "Slot write failed");
                false
            }
        }
    }

    fn remove(&self, key: &str) -> bool {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => {
                tracing::warn!(key, error = %e, "Slot remove failed");
                false
            }
        }
    }
}
