// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Bounded recency (LRU) cache shared between concurrent gate evaluations.
//!
//! Reads never change recency order: [`BoundedCache::get`] is a pure
//! lookup. Only [`BoundedCache::add`] promotes an entry, and it evicts the
//! least recently added entry once capacity is exceeded.

use lru::LruCache;
use parking_lot::Mutex;
use std::borrow::Borrow;
use std::hash::Hash;
use std::num::NonZeroUsize;

/// Thread-safe fixed-capacity LRU cache.
pub struct BoundedCache<K: Hash + Eq, V> {
    entries: Mutex<LruCache<K, V>>,
}

impl<K: Hash + Eq, V: Clone> BoundedCache<K, V> {
    /// Create an empty cache holding at most `capacity` entries.
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Look up a value without touching recency order.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.lock().peek(key).cloned()
    }

    /// Insert or update a value and mark it most recently used.
    ///
    /// Returns the previous value for the key, if any.
    pub fn add(&self, key: K, value: V) -> Option<V> {
        self.entries.lock().put(key, value)
    }

    /// Whether the key is present. Does not touch recency order.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries.lock().contains(key)
    }

    /// Insert the key only if it is absent. Returns true if it was inserted.
    ///
    /// The lookup and the insert happen under one lock, so two concurrent
    /// callers with the same key cannot both succeed.
    pub fn add_if_absent(&self, key: K, value: V) -> bool {
        let mut entries = self.entries.lock();
        if entries.contains(&key) {
            return false;
        }
        entries.put(key, value);
        true
    }

    /// Insert the key if it is absent, or if `replace` accepts the current
    /// value. Returns true if the value was written.
    ///
    /// The decision and the write happen under one lock.
    pub fn add_if<F>(&self, key: K, value: V, replace: F) -> bool
    where
        F: FnOnce(&V) -> bool,
    {
        let mut entries = self.entries.lock();
        if let Some(current) = entries.peek(&key) {
            if !replace(current) {
                return false;
            }
        }
        entries.put(key, value);
        true
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    /// Evict all entries.
    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl<K: Hash + Eq, V> std::fmt::Debug for BoundedCache<K, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let entries = self.entries.lock();
        f.debug_struct("BoundedCache")
            .field("len", &entries.len())
            .field("capacity", &entries.cap())
            .finish()
    }
}
