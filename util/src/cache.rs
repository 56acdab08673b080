//! Time-boxed in-memory cache with an injected clock.
//!
//! Replaces the ambient module-level cache object pattern: the TTL and the
//! clock are explicit constructor parameters, and the instance is passed
//! around rather than reached for globally.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

/// Source of "now" for cache expiry. Injected so tests can drive time by hand.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Production clock backed by `Instant::now`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A cache whose entries expire `ttl` after insertion.
///
/// Expired entries are dropped lazily on access; `purge_expired` sweeps them
/// eagerly when a caller wants the memory back.
pub struct TtlCache<K, V, C = SystemClock> {
    ttl: Duration,
    clock: C,
    entries: HashMap<K, (Instant, V)>,
}

impl<K: Eq + Hash, V> TtlCache<K, V, SystemClock> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, SystemClock)
    }
}

impl<K: Eq + Hash, V, C: Clock> TtlCache<K, V, C> {
    pub fn with_clock(ttl: Duration, clock: C) -> Self {
        Self {
            ttl,
            clock,
            entries: HashMap::new(),
        }
    }

    /// Returns the cached value for `key` if it has not expired, dropping it
    /// if it has.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let now = self.clock.now();
        let expired = match self.entries.get(key) {
            Some((stamped, _)) => now.duration_since(*stamped) >= self.ttl,
            None => return None,
        };
        if expired {
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|(_, v)| v)
    }

    /// Inserts a value stamped at the injected clock's current instant,
    /// replacing any previous entry for the key.
    pub fn insert(&mut self, key: K, value: V) {
        let now = self.clock.now();
        self.entries.insert(key, (now, value));
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|(_, v)| v)
    }

    /// Drops every expired entry.
    pub fn purge_expired(&mut self) {
        let now = self.clock.now();
        let ttl = self.ttl;
        self.entries
            .retain(|_, (stamped, _)| now.duration_since(*stamped) < ttl);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries currently held, expired or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Test clock advanced by hand.
    #[derive(Clone)]
    struct ManualClock {
        base: Instant,
        offset: Rc<Cell<Duration>>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                base: Instant::now(),
                offset: Rc::new(Cell::new(Duration::ZERO)),
            }
        }

        fn advance(&self, by: Duration) {
            self.offset.set(self.offset.get() + by);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Instant {
            self.base + self.offset.get()
        }
    }

    #[test]
    fn entries_expire_after_ttl() {
        let clock = ManualClock::new();
        let mut cache = TtlCache::with_clock(Duration::from_secs(30), clock.clone());

        cache.insert("events?academy_id=1", vec![1, 2, 3]);
        assert_eq!(cache.get(&"events?academy_id=1"), Some(&vec![1, 2, 3]));

        clock.advance(Duration::from_secs(29));
        assert!(cache.get(&"events?academy_id=1").is_some());

        clock.advance(Duration::from_secs(1));
        assert!(cache.get(&"events?academy_id=1").is_none());
        assert!(cache.is_empty(), "expired entry dropped on access");
    }

    #[test]
    fn insert_refreshes_the_stamp() {
        let clock = ManualClock::new();
        let mut cache = TtlCache::with_clock(Duration::from_secs(10), clock.clone());

        cache.insert("k", 1);
        clock.advance(Duration::from_secs(8));
        cache.insert("k", 2);
        clock.advance(Duration::from_secs(8));

        // 16s after the first insert, but only 8s after the refresh.
        assert_eq!(cache.get(&"k"), Some(&2));
    }

    #[test]
    fn purge_sweeps_only_expired_entries() {
        let clock = ManualClock::new();
        let mut cache = TtlCache::with_clock(Duration::from_secs(10), clock.clone());

        cache.insert("old", 1);
        clock.advance(Duration::from_secs(7));
        cache.insert("fresh", 2);
        clock.advance(Duration::from_secs(5));

        cache.purge_expired();
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&"fresh"), Some(&2));
    }
}
