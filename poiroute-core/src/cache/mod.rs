//! In-memory caches shared across ranking requests.
//!
//! Both caches are bounded FIFO maps behind a `parking_lot` mutex, so lookup,
//! insertion and eviction are atomic with respect to each other. They are
//! plain values owned by (or injected into) an engine, never globals.

mod fifo;

use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use crate::model::{GraphId, Mode, StreetGraph};
use crate::{Meters, StreetNodeId};

pub use fifo::FifoCache;

pub const DEFAULT_GRAPH_CACHE_CAPACITY: usize = 50;
pub const DEFAULT_NODE_CACHE_CAPACITY: usize = 256;

/// Hit/miss counters and current size of a cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub len: usize,
}

/// Thread-safe bounded FIFO cache handing out clones of its values
#[derive(Debug)]
pub struct SharedCache<K, V> {
    inner: Mutex<FifoCache<K, V>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<K: Hash + Eq + Clone, V: Clone> SharedCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(FifoCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &K) -> Option<V> {
        let found = self.inner.lock().get(key).cloned();
        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Store `value` unless another caller got there first, returning
    /// whichever value is now cached
    pub fn get_or_insert(&self, key: K, value: V) -> V {
        let mut inner = self.inner.lock();
        match inner.get_or_insert(key, value.clone()) {
            Some(stored) => stored.clone(),
            None => value,
        }
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            len: self.inner.lock().len(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.inner.lock().capacity()
    }

    pub fn clear(&self) {
        self.inner.lock().clear();
    }
}

/// Graph cache key; coordinates and radius are compared bit for bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GraphKey {
    lat: u64,
    lon: u64,
    radius: u64,
    mode: Mode,
}

impl GraphKey {
    pub fn new(center_lat: f64, center_lon: f64, radius_m: Meters, mode: Mode) -> Self {
        Self {
            lat: center_lat.to_bits(),
            lon: center_lon.to_bits(),
            radius: radius_m.to_bits(),
            mode,
        }
    }
}

/// Node cache key: a coordinate within one particular graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeKey {
    graph: GraphId,
    lat: u64,
    lon: u64,
}

impl NodeKey {
    pub fn new(graph: GraphId, lat: f64, lon: f64) -> Self {
        Self {
            graph,
            lat: lat.to_bits(),
            lon: lon.to_bits(),
        }
    }
}

pub type GraphCache = SharedCache<GraphKey, Arc<StreetGraph>>;
pub type NodeCache = SharedCache<NodeKey, StreetNodeId>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn counts_hits_and_misses() {
        let cache: SharedCache<u32, u32> = SharedCache::new(2);
        assert_eq!(cache.get(&1), None);
        cache.get_or_insert(1, 10);
        assert_eq!(cache.get(&1), Some(10));

        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses, stats.len), (1, 1, 1));
    }

    #[test]
    fn concurrent_inserts_agree_on_one_value() {
        let cache: Arc<SharedCache<&str, usize>> = Arc::new(SharedCache::new(8));
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || cache.get_or_insert("key", i))
            })
            .collect();
        let values: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(values.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(cache.stats().len, 1);
    }

    #[test]
    fn graph_keys_distinguish_modes() {
        assert_ne!(
            GraphKey::new(41.0, 29.0, 1000.0, Mode::Drive),
            GraphKey::new(41.0, 29.0, 1000.0, Mode::Walk)
        );
    }
}
