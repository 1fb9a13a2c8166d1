use std::collections::VecDeque;
use std::hash::Hash;

use hashbrown::HashMap;

/// Size-bounded map evicting the oldest inserted entry first.
///
/// Reads do not refresh an entry's position: this is insertion-order (FIFO)
/// eviction, not least-recently-used.
#[derive(Debug)]
pub struct FifoCache<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V> FifoCache<K, V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    /// Insert `value` unless `key` is already present; returns the stored value.
    ///
    /// When full, the oldest entry is evicted in the same step. A cache with
    /// zero capacity stores nothing and hands `value` straight back.
    pub fn get_or_insert(&mut self, key: K, value: V) -> Option<&V> {
        if self.capacity == 0 {
            return None;
        }
        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.capacity {
                let Some(oldest) = self.order.pop_front() else {
                    break;
                };
                self.entries.remove(&oldest);
            }
            self.order.push_back(key.clone());
            self.entries.insert(key.clone(), value);
        }
        self.entries.get(&key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_inserted_entry() {
        let mut cache = FifoCache::new(2);
        cache.get_or_insert("a", 1);
        cache.get_or_insert("b", 2);
        // Reading does not protect "a"
        assert_eq!(cache.get(&"a"), Some(&1));
        cache.get_or_insert("c", 3);

        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(&2));
        assert_eq!(cache.get(&"c"), Some(&3));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn first_insert_wins() {
        let mut cache = FifoCache::new(4);
        cache.get_or_insert("a", 1);
        assert_eq!(cache.get_or_insert("a", 2), Some(&1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let mut cache = FifoCache::new(0);
        assert_eq!(cache.get_or_insert("a", 1), None);
        assert!(cache.is_empty());
    }
}
