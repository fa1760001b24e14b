// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Persisted key-value stores.
//!
//! Saved form values (`<tab>Form`) and service responses (`<tab>Params`) are
//! kept in a [`Store`]. A session uses two: one that lives as long as the
//! session and one that outlives it (see [`crate::tab::StoreKind`]).

mod error;
#[cfg(test)]
mod tests;

pub use error::StoreError;

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, trace};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{
    constants::{DURABLE_STORE_FILENAME, SESSION_STORE_FILENAME},
    tab::StoreKind,
};

pub trait Store {
    /// Get the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError>;

    /// Store `value` under `key`, replacing anything already there.
    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError>;

    /// Remove anything stored under `key`.
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Remove everything.
    fn clear(&mut self) -> Result<(), StoreError>;

    /// Is anything stored under `key`?
    fn contains(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }
}

/// Get and deserialise the value stored under `key`.
pub fn load<T: DeserializeOwned>(store: &dyn Store, key: &str) -> Result<Option<T>, StoreError> {
    match store.get(key)? {
        None => Ok(None),
        Some(v) => serde_json::from_value(v)
            .map(Some)
            .map_err(|e| StoreError::Decode {
                key: key.to_string(),
                err: e.to_string(),
            }),
    }
}

/// Serialise and store `value` under `key`.
pub fn save<T: Serialize>(store: &mut dyn Store, key: &str, value: &T) -> Result<(), StoreError> {
    let v = serde_json::to_value(value).map_err(|e| StoreError::Encode {
        key: key.to_string(),
        err: e.to_string(),
    })?;
    store.set(key, v)
}

/// The two stores a session persists to.
pub struct Stores {
    pub session: Box<dyn Store>,
    pub durable: Box<dyn Store>,
}

impl Stores {
    pub fn new(session: Box<dyn Store>, durable: Box<dyn Store>) -> Stores {
        Stores { session, durable }
    }

    /// Two empty [`MemoryStore`]s.
    pub fn in_memory() -> Stores {
        Stores::new(Box::new(MemoryStore::new()), Box::new(MemoryStore::new()))
    }

    /// Open (or prepare to create) the JSON file stores in `dir`.
    pub fn open_dir(dir: &Path) -> Result<Stores, StoreError> {
        Ok(Stores::new(
            Box::new(JsonFileStore::open(dir.join(SESSION_STORE_FILENAME))?),
            Box::new(JsonFileStore::open(dir.join(DURABLE_STORE_FILENAME))?),
        ))
    }

    pub fn get(&self, kind: StoreKind) -> &dyn Store {
        match kind {
            StoreKind::Session => self.session.as_ref(),
            StoreKind::Durable => self.durable.as_ref(),
        }
    }

    pub fn get_mut(&mut self, kind: StoreKind) -> &mut dyn Store {
        match kind {
            StoreKind::Session => self.session.as_mut(),
            StoreKind::Durable => self.durable.as_mut(),
        }
    }
}

impl std::fmt::Debug for Stores {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stores").finish_non_exhaustive()
    }
}

/// A store that only lives in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: IndexMap<String, Value>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.shift_remove(key);
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        Ok(())
    }
}

/// A store backed by a single JSON file. The whole file is rewritten on every
/// modification.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: IndexMap<String, Value>,
}

impl JsonFileStore {
    /// Open the store at `path`. A missing file is an empty store; the file
    /// (and its parent directories) are created on the first write.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<JsonFileStore, StoreError> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            debug!("Reading store {}", path.display());
            let f = BufReader::new(File::open(&path)?);
            serde_json::from_reader(f).map_err(|e| StoreError::Corrupt {
                file: path.display().to_string(),
                err: e.to_string(),
            })?
        } else {
            debug!("Store {} doesn't exist yet; starting empty", path.display());
            IndexMap::new()
        };
        Ok(JsonFileStore { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        trace!("Writing store {}", self.path.display());
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        // Write to a sibling file first so that an interrupted write doesn't
        // leave a truncated store behind.
        let tmp = self.path.with_extension("json.tmp");
        {
            let mut f = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut f, &self.entries).map_err(|e| {
                StoreError::Encode {
                    key: self.path.display().to_string(),
                    err: e.to_string(),
                }
            })?;
            f.flush()?;
        }
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Store for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: Value) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        if self.entries.shift_remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        Ok(())
    }
}
