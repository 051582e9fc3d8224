use core::fmt;
use core::hash::Hash;

use lru::LruCache;

/// A bounded map that evicts the oldest-inserted entries first.
///
/// Reads never promote entries (they go through `peek`), so the underlying LRU order is pure
/// insertion order. Re-inserting an existing key replaces its value and makes it the newest
/// entry. When the map grows past `capacity`, at least `evict_batch` of the oldest entries are
/// dropped at once, so a burst of inserts (e.g. resize thrashing) does not evict on every call.
pub struct BoundedCache<K: Hash + Eq, V> {
    map: LruCache<K, V>,
    capacity: usize,
    evict_batch: usize,
    evicted: u64,
}

impl<K: Hash + Eq, V> BoundedCache<K, V> {
    pub fn new(capacity: usize, evict_batch: usize) -> Self {
        Self {
            map: LruCache::unbounded(),
            capacity: capacity.max(1),
            evict_batch: evict_batch.max(1),
            evicted: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Total number of entries dropped by overflow eviction since construction.
    pub fn evicted(&self) -> u64 {
        self.evicted
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.map.peek(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.map.contains(key)
    }

    /// Inserts `value`, returning how many old entries were evicted to make room.
    pub fn insert(&mut self, key: K, value: V) -> usize {
        self.map.put(key, value);
        let len = self.map.len();
        if len <= self.capacity {
            return 0;
        }
        // Never evict the entry that was just written.
        let n = (len - self.capacity).max(self.evict_batch).min(len - 1);
        for _ in 0..n {
            self.map.pop_lru();
        }
        self.evicted = self.evicted.saturating_add(n as u64);
        pdebug!(evicted = n, remaining = self.map.len(), "BoundedCache::insert overflow");
        n
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.map.pop(key)
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K: Hash + Eq, V> fmt::Debug for BoundedCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedCache")
            .field("len", &self.map.len())
            .field("capacity", &self.capacity)
            .field("evict_batch", &self.evict_batch)
            .field("evicted", &self.evicted)
            .finish()
    }
}

struct Stamped<V> {
    inserted_ms: u64,
    value: V,
}

/// A [`BoundedCache`] whose entries also expire a fixed time after insertion.
///
/// Time is supplied by the caller (`now_ms`), like every other clock-dependent API in this
/// crate.
pub struct ExpiringCache<K: Hash + Eq, V> {
    inner: BoundedCache<K, Stamped<V>>,
    ttl_ms: u64,
}

impl<K: Hash + Eq, V> ExpiringCache<K, V> {
    pub fn new(capacity: usize, ttl_ms: u64) -> Self {
        Self {
            inner: BoundedCache::new(capacity, 1),
            ttl_ms,
        }
    }

    pub fn ttl_ms(&self) -> u64 {
        self.ttl_ms
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns the live entry for `key`, dropping it first if it has expired.
    pub fn get(&mut self, key: &K, now_ms: u64) -> Option<&V> {
        let expired = match self.inner.get(key) {
            None => return None,
            Some(e) => now_ms.saturating_sub(e.inserted_ms) >= self.ttl_ms,
        };
        if expired {
            ptrace!(now_ms, "ExpiringCache::get expired");
            self.inner.remove(key);
            return None;
        }
        self.inner.get(key).map(|e| &e.value)
    }

    pub fn insert(&mut self, key: K, value: V, now_ms: u64) {
        self.inner.insert(
            key,
            Stamped {
                inserted_ms: now_ms,
                value,
            },
        );
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }
}

impl<K: Hash + Eq, V> fmt::Debug for ExpiringCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExpiringCache")
            .field("len", &self.inner.len())
            .field("ttl_ms", &self.ttl_ms)
            .finish()
    }
}
