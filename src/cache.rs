//! Cache abstraction for nearby-restaurant results.
//!
//! # Architecture
//!
//! - **CacheStore trait**: byte-oriented key/value store with per-entry TTL.
//!   Expiry is the store's job; nothing above it tracks entry age.
//! - **MemoryCacheStore**: in-process store for tests, the CLI and single-node
//!   deployments.
//! - **GeoCache**: typed view keyed by [`GeoCell`](crate::geo::GeoCell) that
//!   encodes restaurant lists and treats every failure as a miss.
//!
//! Stores are constructed by the caller and handed to the service as
//! `Arc<dyn CacheStore>`; there is no global pool.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use forkful::cache::{CacheStore, GeoCache, MemoryCacheStore};
//! use forkful::config::GeoCacheConfig;
//! use forkful::geo::GeoCell;
//!
//! let store: Arc<dyn CacheStore> = Arc::new(MemoryCacheStore::new());
//! let cache = GeoCache::new(store, GeoCacheConfig::default());
//!
//! let cell = GeoCell::encode(20.0, 30.0, 7);
//! assert!(cache.get(&cell).is_none());
//! cache.put(&cell, &[]).unwrap();
//! assert_eq!(cache.get(&cell), Some(vec![]));
//! ```

use std::fmt::Debug;

use crate::error::Result;

pub mod geo_cache;
pub mod memory;

pub use geo_cache::GeoCache;
pub use memory::MemoryCacheStore;

/// A key/value store with per-entry expiry.
///
/// Implementations must be safe for concurrent `get`/`set` on the same key;
/// concurrent writers are last-write-wins.
pub trait CacheStore: Send + Sync + Debug {
    /// Fetch the bytes stored under `key`, `None` if absent or expired.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<()>;

    /// Whether a live entry exists for `key`.
    fn exists(&self, key: &str) -> Result<bool>;
}
