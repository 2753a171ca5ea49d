//! Saving values under a key.
//!
//! [`Persister`] is deliberately its own trait: a fetch-only type never has
//! to provide a save method. [`PreferenceStore`] is the concrete key/value
//! store, a single JSON object on disk.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

#[cfg(test)]
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{FetchError, FetchResult};

/// Persist a value under a key and report the outcome.
///
/// The completion runs exactly once. On success it gets the value back.
pub trait Persister: Send + Sync {
    fn save<T, F>(&self, value: T, key: &str, completion: F)
    where
        T: Serialize + Send + 'static,
        F: FnOnce(FetchResult<T>) + Send + 'static;
}

/// Read-only key lookup, for consumers that need to know what is saved.
pub trait Lookup: Send + Sync {
    fn contains(&self, key: &str) -> bool;
}

/// Key under which a favorite `id` of `category` is stored.
pub fn favorite_key(category: &str, id: impl std::fmt::Display) -> String {
    format!("favorite-{category}-{id}")
}

/// A file-backed key/value store in the spirit of a system preference store.
///
/// The whole map is rewritten on every save: first to `<path>.tmp`, then
/// renamed over `<path>`.
#[derive(Debug)]
pub struct PreferenceStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, Value>>,
}

impl PreferenceStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> FetchResult<Self> {
        let path = path.into();
        let values = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| FetchError::persist(path.display().to_string(), e))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(FetchError::persist(path.display().to_string(), e)),
        };
        debug!(path = %path.display(), entries = values.len(), "preference store opened");

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Read back a saved value. `None` if absent or of a different shape.
    #[cfg(test)]
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let values = self.lock();
        let value = values.get(key)?.clone();
        serde_json::from_value(value).ok()
    }

    /// Number of saved keys.
    pub fn count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, Value>> {
        // Mutations are single inserts/removes; a poisoned map is still whole.
        self.values.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self, values: &BTreeMap<String, Value>) -> io::Result<()> {
        let bytes = serde_json::to_vec_pretty(values)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &self.path)
    }

    fn store<T: Serialize>(&self, value: &T, key: &str) -> FetchResult<()> {
        let encoded = serde_json::to_value(value).map_err(|e| FetchError::persist(key, e))?;

        let mut values = self.lock();
        let previous = values.insert(key.to_string(), encoded);
        if let Err(e) = self.write(&values) {
            // Keep memory in step with what is on disk.
            match previous {
                Some(old) => values.insert(key.to_string(), old),
                None => values.remove(key),
            };
            return Err(FetchError::persist(key, e));
        }
        Ok(())
    }
}

impl Persister for PreferenceStore {
    fn save<T, F>(&self, value: T, key: &str, completion: F)
    where
        T: Serialize + Send + 'static,
        F: FnOnce(FetchResult<T>) + Send + 'static,
    {
        match self.store(&value, key) {
            Ok(()) => {
                info!(key, path = %self.path.display(), "saved");
                completion(Ok(value));
            }
            Err(e) => {
                warn!(key, error = %e, "save failed");
                completion(Err(e));
            }
        }
    }
}

impl Lookup for PreferenceStore {
    fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }
}
