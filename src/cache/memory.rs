//! In-memory cache store.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use parking_lot::RwLock;

use crate::cache::CacheStore;
use crate::error::{ForkfulError, Result};

/// Every this many writes, `set` sweeps out expired entries.
const SWEEP_INTERVAL: usize = 64;

#[derive(Debug, Clone)]
struct Entry {
    value: Arc<[u8]>,
    /// `None` when the ttl reaches past what `Instant` can represent.
    expires_at: Option<Instant>,
}

impl Entry {
    fn new(value: &[u8], ttl_seconds: u64) -> Self {
        Self {
            value: Arc::from(value),
            expires_at: Instant::now().checked_add(Duration::from_secs(ttl_seconds)),
        }
    }

    fn is_live(&self, now: Instant) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// A thread-safe in-memory [`CacheStore`].
///
/// Expired entries are invisible to readers. They are dropped on the next
/// write to the same key, by a sweep every few writes, or by
/// [`purge_expired`](Self::purge_expired).
#[derive(Debug, Default)]
pub struct MemoryCacheStore {
    entries: RwLock<HashMap<String, Entry>>,
    writes: AtomicUsize,
    closed: RwLock<bool>,
}

impl MemoryCacheStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn check_closed(&self) -> Result<()> {
        if *self.closed.read() {
            Err(ForkfulError::cache("cache store is closed"))
        } else {
            Ok(())
        }
    }

    /// Number of entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Drop every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        sweep(&mut self.entries.write())
    }

    /// Remove all entries.
    pub fn flush_all(&self) {
        self.entries.write().clear();
    }

    /// Flush and refuse further operations.
    pub fn close(&self) {
        self.flush_all();
        *self.closed.write() = true;
    }
}

fn sweep(entries: &mut HashMap<String, Entry>) -> usize {
    let now = Instant::now();
    let before = entries.len();
    entries.retain(|_, entry| entry.is_live(now));
    before - entries.len()
}

impl CacheStore for MemoryCacheStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.check_closed()?;

        let now = Instant::now();
        let entries = self.entries.read();
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.to_vec()))
    }

    fn set(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<()> {
        self.check_closed()?;

        let entry = Entry::new(value, ttl_seconds);
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), entry);
        if (self.writes.fetch_add(1, Ordering::Relaxed) + 1) % SWEEP_INTERVAL == 0 {
            sweep(&mut entries);
        }
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        self.check_closed()?;

        let now = Instant::now();
        Ok(self
            .entries
            .read()
            .get(key)
            .is_some_and(|entry| entry.is_live(now)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let store = MemoryCacheStore::new();
        assert!(store.is_empty());

        store.set("tdnu20t", b"payload", 60).unwrap();
        assert_eq!(store.get("tdnu20t").unwrap(), Some(b"payload".to_vec()));
        assert!(store.exists("tdnu20t").unwrap());
        assert!(!store.exists("other").unwrap());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_set_overwrites() {
        let store = MemoryCacheStore::new();
        store.set("k", b"first", 60).unwrap();
        store.set("k", b"second", 60).unwrap();

        assert_eq!(store.get("k").unwrap(), Some(b"second".to_vec()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let store = MemoryCacheStore::new();
        store.set("k", b"gone", 0).unwrap();

        assert_eq!(store.get("k").unwrap(), None);
        assert!(!store.exists("k").unwrap());
        assert_eq!(store.purge_expired(), 1);
        assert!(store.is_empty());
    }

    #[test]
    fn test_huge_ttl_never_expires() {
        let store = MemoryCacheStore::new();
        store.set("k", b"v", u64::MAX).unwrap();

        assert_eq!(store.get("k").unwrap(), Some(b"v".to_vec()));
        assert!(store.exists("k").unwrap());
        assert_eq!(store.purge_expired(), 0);
    }

    #[test]
    fn test_writes_sweep_expired_cells() {
        let store = MemoryCacheStore::new();
        for i in 0..SWEEP_INTERVAL - 1 {
            store.set(&format!("cell-{i}"), b"stale", 0).unwrap();
        }
        assert_eq!(store.len(), SWEEP_INTERVAL - 1);

        store.set("fresh", b"live", 60).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("fresh").unwrap(), Some(b"live".to_vec()));
    }

    #[test]
    fn test_closed_store_errors() {
        let store = MemoryCacheStore::new();
        store.set("k", b"v", 60).unwrap();
        store.close();

        assert!(store.get("k").is_err());
        assert!(store.set("k", b"v", 60).is_err());
        assert!(store.exists("k").is_err());
    }

    #[test]
    fn test_concurrent_writers() {
        let store = Arc::new(MemoryCacheStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    store.set("shared", format!("v{i}").as_bytes(), 60).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let value = store.get("shared").unwrap().unwrap();
        assert!(String::from_utf8(value).unwrap().starts_with('v'));
        assert_eq!(store.len(), 1);
    }
}
