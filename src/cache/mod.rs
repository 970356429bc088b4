//! Cache module for memoizing API responses
//!
//! Every JSON document fetched from the API is kept in memory keyed by its URL
//! and periodically written to a single file, so later runs can answer the same
//! questions without touching the network.

mod storage;
mod store;

pub use storage::{CacheStorage, FileStorage, MemoryStorage};
pub use store::{CacheError, PersistentCache, DEFAULT_FLUSH_EVERY};
