//! Memoization cache shared by the calculators
//!
//! Each calculator owns (or shares through an `Arc`) a [`MemoCache`] keyed by a
//! canonical signature of its inputs. Results are deterministic, so a value is never
//! overwritten once stored: two callers racing on the same key compute equal values
//! and the first write wins. Capacity is bounded; the least recently used entry is
//! evicted when the cache is full.

use lru::LruCache;
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::DEFAULT_CACHE_CAPACITY;

/// Canonical signature of a calculator call
///
/// Built by appending every input in call order. Floats are written with their
/// shortest round-trip representation so distinct inputs never share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Start a key in the given namespace (normally the operation name)
    pub fn new(namespace: &str) -> Self {
        Self(namespace.to_string())
    }

    pub fn number(mut self, value: f64) -> Self {
        self.0.push('|');
        self.0.push_str(&format!("{:?}", value));
        self
    }

    pub fn numbers(mut self, values: &[f64]) -> Self {
        self.0.push_str("|[");
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.0.push(',');
            }
            self.0.push_str(&format!("{:?}", value));
        }
        self.0.push(']');
        self
    }

    pub fn text(mut self, value: impl fmt::Display) -> Self {
        self.0.push('|');
        self.0.push_str(&value.to_string());
        self
    }

    pub fn flag(self, value: bool) -> Self {
        self.text(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of cache usage
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
    pub capacity: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Bounded, thread-safe memoization map
pub struct MemoCache<V> {
    entries: Mutex<LruCache<CacheKey, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<V: Clone> MemoCache<V> {
    /// Create a cache holding at most `capacity` entries (a capacity of 0 is raised to 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a stored value, marking it most recently used
    pub fn get(&self, key: &CacheKey) -> Option<V> {
        let found = self.entries.lock().get(key).cloned();
        match found {
            Some(_) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                log::debug!("cache hit: {}", key);
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                log::debug!("cache miss: {}", key);
            }
        }
        found
    }

    /// Store a value unless the key is already present
    pub fn insert(&self, key: CacheKey, value: V) {
        let mut entries = self.entries.lock();
        if !entries.contains(&key) {
            entries.put(key, value);
        }
    }

    /// Return the cached value or compute, store and return it
    ///
    /// The computation runs outside the lock.
    pub fn get_or_insert_with(&self, key: CacheKey, compute: impl FnOnce() -> V) -> V {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = compute();
        self.insert(key, value.clone());
        value
    }

    /// Fallible variant of [`MemoCache::get_or_insert_with`]; errors are not cached
    pub fn get_or_try_insert_with<E>(
        &self,
        key: CacheKey,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(value) = self.get(&key) {
            return Ok(value);
        }
        let value = compute()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.lock().contains(key)
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Drop all entries and reset statistics
    pub fn clear(&self) {
        self.entries.lock().clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.entries.lock();
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: entries.len(),
            capacity: entries.cap().get(),
        }
    }
}

impl<V: Clone> Default for MemoCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl<V> fmt::Debug for MemoCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.lock();
        f.debug_struct("MemoCache")
            .field("entries", &entries.len())
            .field("capacity", &entries.cap())
            .field("hits", &self.hits.load(Ordering::Relaxed))
            .field("misses", &self.misses.load(Ordering::Relaxed))
            .finish()
    }
}
