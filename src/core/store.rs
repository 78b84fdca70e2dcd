//! Persistent key-value store for expansion state.
//!
//! The accordion only ever needs two operations: read a list of ids under a
//! key, and replace that list.  [`JsonFileStore`] keeps every key in one
//! JSON object on disk so the state survives restarts; [`MemoryStore`]
//! backs tests and throwaway sessions.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("store file {path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// `get`/`set` access to lists of strings keyed by name.
pub trait KeyValueStore {
    /// `None` when nothing has been written under `key` yet.
    fn get(&self, key: &str) -> Option<Vec<String>>;

    /// Replace the whole value under `key`.
    fn set(&mut self, key: &str, value: &[String]) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Option<Vec<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &[String]) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

// ───────────────────────────────────────── memory ────────────

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<String>>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate `key`, as if a previous session had written it.
    pub fn with_entry(mut self, key: &str, value: &[&str]) -> Self {
        self.entries
            .insert(key.to_string(), value.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Number of `set` calls seen so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Vec<String>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &[String]) -> Result<(), StoreError> {
        self.writes += 1;
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

// ───────────────────────────────────────── file ──────────────

/// All keys in a single JSON object file.
///
/// `set` re-reads the file and replaces only its own key, so stores for
/// different keys can share one file.  The write goes through a sibling
/// temp file and a rename, so the file is never left half-written.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    entries: Entries,
}

type Entries = BTreeMap<String, Vec<String>>;

fn read_entries(path: &Path) -> Result<Entries, StoreError> {
    match std::fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(Entries::new()),
        Ok(contents) => serde_json::from_str(&contents).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Entries::new()),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl JsonFileStore {
    /// Open the store at `path`.  A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = read_entries(&path)?;
        tracing::debug!("opened store {} ({} keys)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write(&self, entries: &Entries) -> Result<(), StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let json = serde_json::to_string_pretty(entries).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json).map_err(io_err)?;
        std::fs::rename(&tmp, &self.path).map_err(io_err)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Vec<String>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &[String]) -> Result<(), StoreError> {
        // Other keys may have been written by another session since open.
        let mut entries = read_entries(&self.path)?;
        entries.insert(key.to_string(), value.to_vec());
        self.write(&entries)?;
        self.entries = entries;
        Ok(())
    }
}
