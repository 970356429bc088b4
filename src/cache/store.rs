//! In-memory response cache keyed by request URL
//!
//! Provides a `PersistentCache` that is loaded once at startup, grows as new
//! URLs are fetched, and is written back to its storage every `flush_every`
//! insertions and once more at shutdown.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tracing::{debug, trace, warn};

use super::storage::{CacheStorage, FileStorage};

/// Number of insertions between automatic flushes
pub const DEFAULT_FLUSH_EVERY: u64 = 50;

/// Errors that can occur when persisting the cache
#[derive(Debug, Error)]
pub enum CacheError {
    /// Writing the cache document failed
    #[error("Failed to write cache: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the cache document failed
    #[error("Failed to serialize cache: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, Value>,
    /// Insertions since the cache was loaded
    misses: u64,
}

/// Memoizes decoded JSON responses by URL
///
/// Entries are never invalidated; once a URL is cached its document is reused
/// for the rest of the process and, after a flush, by later runs.
#[derive(Debug)]
pub struct PersistentCache<S = FileStorage> {
    state: Mutex<CacheState>,
    storage: S,
    flush_every: u64,
}

impl PersistentCache<FileStorage> {
    /// Loads the cache from a JSON file, flushing every `DEFAULT_FLUSH_EVERY` insertions
    pub fn open(path: impl Into<std::path::PathBuf>) -> Self {
        Self::load(FileStorage::new(path), DEFAULT_FLUSH_EVERY)
    }
}

impl<S: CacheStorage> PersistentCache<S> {
    /// Loads the cache from `storage`
    ///
    /// A missing document yields an empty cache. A document that cannot be read
    /// or parsed is discarded entirely and the cache starts empty.
    ///
    /// # Arguments
    /// * `storage` - Where the cache document lives
    /// * `flush_every` - Insertions between automatic flushes (zero is treated as one)
    pub fn load(storage: S, flush_every: u64) -> Self {
        let entries = match storage.read() {
            Ok(None) => HashMap::new(),
            Ok(Some(text)) => match serde_json::from_str::<HashMap<String, Value>>(&text) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!(error = %e, "Cache file corrupted. Resetting cache.");
                    HashMap::new()
                }
            },
            Err(e) => {
                warn!(error = %e, "Cache file unreadable. Resetting cache.");
                HashMap::new()
            }
        };
        debug!(entries = entries.len(), "Loaded response cache");

        Self {
            state: Mutex::new(CacheState {
                entries,
                misses: 0,
            }),
            storage,
            flush_every: flush_every.max(1),
        }
    }

    // The guarded map holds no invariant that a panic could break halfway.
    fn state(&self) -> MutexGuard<'_, CacheState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the cached document for `key`, if any
    pub fn get(&self, key: &str) -> Option<Value> {
        self.state().entries.get(key).cloned()
    }

    /// Returns whether `key` is cached
    pub fn contains(&self, key: &str) -> bool {
        self.state().entries.contains_key(key)
    }

    /// Stores `value` under `key` and flushes when the insertion count reaches
    /// a multiple of the flush interval
    pub fn put(&self, key: impl Into<String>, value: Value) -> Result<(), CacheError> {
        let mut state = self.state();
        state.entries.insert(key.into(), value);
        state.misses += 1;
        trace!(misses = state.misses, "Cached response");

        if state.misses % self.flush_every == 0 {
            self.persist(&state)?;
        }
        Ok(())
    }

    /// Writes the whole cache to storage
    pub fn flush(&self) -> Result<(), CacheError> {
        let state = self.state();
        self.persist(&state)
    }

    fn persist(&self, state: &CacheState) -> Result<(), CacheError> {
        let json = serde_json::to_string_pretty(&state.entries)?;
        self.storage.write(&json)?;
        debug!(entries = state.entries.len(), "Flushed response cache");
        Ok(())
    }

    /// Number of cached URLs
    pub fn len(&self) -> usize {
        self.state().entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of insertions since the cache was loaded
    pub fn misses(&self) -> u64 {
        self.state().misses
    }

    /// The backing storage
    pub fn storage(&self) -> &S {
        &self.storage
    }
}
