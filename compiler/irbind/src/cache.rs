//! Weak, address-keyed wrapper cache.
//!
//! Each [`Context`](crate::Context) owns two of these, one for types and one
//! for values. An entry never keeps its wrapper alive: once the last
//! external `Arc` is gone the entry is dead and the next lookup for that
//! address is a miss.
//!
//! # Atomicity
//!
//! Lookup, construction and insertion run under one lock in
//! [`WeakCache::get_or_try_insert_with`]. Two threads racing on the same
//! address therefore always see the same wrapper; splitting the steps
//! would let both classify and both insert.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;

/// Dead entries are swept once the map grows past this many entries, and
/// the threshold then tracks twice the surviving size.
const MIN_SWEEP_THRESHOLD: usize = 256;

struct Entries<T> {
    map: FxHashMap<usize, Weak<T>>,
    sweep_at: usize,
}

impl<T> Entries<T> {
    fn live(&self, key: usize) -> Option<Arc<T>> {
        self.map.get(&key).and_then(Weak::upgrade)
    }

    fn insert(&mut self, key: usize, value: &Arc<T>) {
        if self.map.len() >= self.sweep_at {
            self.map.retain(|_, entry| entry.strong_count() > 0);
            self.sweep_at = (self.map.len() * 2).max(MIN_SWEEP_THRESHOLD);
        }
        self.map.insert(key, Arc::downgrade(value));
    }
}

pub struct WeakCache<T> {
    entries: Mutex<Entries<T>>,
}

impl<T> Default for WeakCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> WeakCache<T> {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(Entries {
                map: FxHashMap::default(),
                sweep_at: MIN_SWEEP_THRESHOLD,
            }),
        }
    }

    /// The live wrapper for `key`, if any.
    pub fn lookup(&self, key: usize) -> Option<Arc<T>> {
        self.entries.lock().live(key)
    }

    /// Record `value` under `key` without extending its lifetime.
    pub fn insert(&self, key: usize, value: &Arc<T>) {
        self.entries.lock().insert(key, value);
    }

    /// Return the live wrapper for `key`, or build, record and return one.
    ///
    /// `make` runs only on a miss. If it fails nothing is recorded.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: usize,
        make: impl FnOnce() -> Result<Arc<T>, E>,
    ) -> Result<Arc<T>, E> {
        let mut entries = self.entries.lock();
        if let Some(live) = entries.live(key) {
            return Ok(live);
        }
        let fresh = make()?;
        entries.insert(key, &fresh);
        Ok(fresh)
    }

    /// Drop the entry for `key`. Returns `true` if a live wrapper was cached.
    ///
    /// Used when the native object behind `key` is destroyed through the
    /// binding, so a reused address cannot resolve to the old wrapper.
    pub fn forget(&self, key: usize) -> bool {
        self.entries
            .lock()
            .map
            .remove(&key)
            .is_some_and(|entry| entry.strong_count() > 0)
    }

    /// True if a live wrapper is cached for `key`.
    pub fn contains(&self, key: usize) -> bool {
        self.lookup(key).is_some()
    }

    /// Number of entries whose wrapper is still alive.
    pub fn live_len(&self) -> usize {
        self.entries
            .lock()
            .map
            .values()
            .filter(|entry| entry.strong_count() > 0)
            .count()
    }

    /// Number of entries, dead ones included.
    pub fn raw_len(&self) -> usize {
        self.entries.lock().map.len()
    }
}
