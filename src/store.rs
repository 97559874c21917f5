//! Persistence adapter for the process-wide stores (ad mode, debt queue).
//!
//! A `Storage` is a plain string key/value surface: `get`/`set`/`remove`.
//! Stores read their key once at init and write back on every mutation;
//! writes are fire-and-forget from the caller's point of view, so persist
//! failures are logged and absorbed rather than bubbled into the state
//! machine.

use crate::error::{AdMomentError, Result};
use log::warn;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

pub trait Storage {
    /// Read the serialized value for `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Write (create or overwrite) the value for `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Delete `key` if present.
    fn remove(&self, key: &str) -> Result<()>;
}

pub type StoreHandle = Rc<dyn Storage>;

/// Write `value` under `key`, warning instead of failing.
///
/// Store mutations are kept in-memory-authoritative: a failed persist must
/// not undo a transition the user already saw.
pub fn persist_or_warn(store: &dyn Storage, key: &str, value: &str) {
    if let Err(e) = store.set(key, value) {
        warn!("could not persist '{}': {}", key, e);
    }
}

// ── File-backed storage ─────────────────────────────────────────────────────

/// One pretty-printed JSON file per key under a base directory.
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new(dir: PathBuf) -> Self {
        JsonFileStorage { dir }
    }

    /// Storage rooted at the platform data directory
    /// (e.g. `~/.local/share/adjustmoment`).
    pub fn default_location() -> Result<Self> {
        let base = dirs::data_dir()
            .ok_or_else(|| AdMomentError::Storage("no data directory on this platform".into()))?;
        Ok(JsonFileStorage::new(base.join("adjustmoment")))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl Storage for JsonFileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.key_path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── In-memory storage ───────────────────────────────────────────────────────

/// Map-backed storage for tests and ephemeral CLI runs.
#[derive(Default)]
pub struct MemoryStorage {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.borrow().contains_key(key)
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}
