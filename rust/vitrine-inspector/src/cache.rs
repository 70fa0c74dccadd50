//! Open store handles, shared across requests.
//!
//! Each canonical database path maps to at most one open handle. Lookups and opens
//! happen under one lock, so concurrent first requests for the same path
//! open the file once and share the result. A failed open leaves nothing
//! behind: the next request for that path tries again, and other paths are
//! unaffected.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use parking_lot::Mutex;
use vitrine_store::{OpenOptions, Store, StoreError, StoreOpener};

use crate::InspectorConfig;

/// Lazily opened, reusable store handles keyed by database path
pub struct ConnectionCache<O>
where
    O: StoreOpener,
{
    opener: O,
    config: Arc<InspectorConfig>,
    handles: Mutex<HashMap<String, Arc<O::Store>>>,
}

impl<O> ConnectionCache<O>
where
    O: StoreOpener,
{
    /// An empty cache that opens stores with `opener`, unlocking them with
    /// the keys in `config`
    pub fn new(opener: O, config: Arc<InspectorConfig>) -> Self {
        Self {
            opener,
            config,
            handles: Mutex::new(HashMap::new()),
        }
    }

    /// The handle for `path`, opening it on first use.
    ///
    /// Handles are keyed by the canonical form of `path`, so different
    /// spellings of one file share a handle. The file's parent is the store
    /// directory and its name the store name; a non-empty key configured for
    /// that name is used to unlock it.
    pub fn resolve(&self, path: &str) -> Result<Arc<O::Store>, StoreError> {
        let canonical = canonical_path(Path::new(path));
        let key = canonical.to_string_lossy().into_owned();

        let mut handles = self.handles.lock();
        if let Some(handle) = handles.get(&key) {
            tracing::debug!(path, "Reusing open store");
            return Ok(handle.clone());
        }

        let mut options = OpenOptions::for_path(&canonical)?;
        if let Some(key) = self.config.encryption_key_for(&options.name) {
            options = options.with_encryption_key(key);
        }

        let handle = match self.opener.open(&options) {
            Ok(store) => Arc::new(store),
            Err(error) => {
                tracing::warn!(path, %error, "Failed to open store");
                return Err(error);
            }
        };
        tracing::info!(path, canonical = %key, "Opened store");

        handles.insert(key, handle.clone());
        Ok(handle)
    }

    /// Close and forget every handle. Calling this on an empty cache does
    /// nothing.
    pub fn close_all(&self) {
        let drained: Vec<(String, Arc<O::Store>)> = self.handles.lock().drain().collect();
        for (path, handle) in drained {
            handle.close();
            tracing::info!(path, "Closed store");
        }
    }

    /// Number of open handles
    pub fn len(&self) -> usize {
        self.handles.lock().len()
    }

    /// Whether no handles are open
    pub fn is_empty(&self) -> bool {
        self.handles.lock().is_empty()
    }
}

/// Resolve links and relative segments. A file that does not exist keeps
/// its absolute spelling so that opening it reports the real error.
fn canonical_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}
