//! Thread-safe, capacity-bounded player-count cache with lazy expiry.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::domain::{CacheEntry, GameId};
use crate::port::Clock;

/// Default maximum number of cached entries.
pub const DEFAULT_CAPACITY: usize = 10_000;

struct Inner {
    entries: HashMap<GameId, CacheEntry>,
    // ids in insertion order; each live key appears exactly once
    order: VecDeque<GameId>,
}

/// Cache of per-game player-count entries.
///
/// Entries expire lazily: expiry is evaluated on each `get`, and an expired
/// entry is removed on detection so a concurrent read arriving between
/// detection and refetch cannot be served stale data. When a `put` of a new
/// id would exceed the capacity, the oldest-inserted entries are evicted.
/// `get` and `put` are individually atomic; `put` is last-write-wins.
pub struct PlayerCountCache {
    inner: RwLock<Inner>,
    capacity: usize,
    clock: Arc<dyn Clock>,
}

impl PlayerCountCache {
    /// Create a cache holding at most `capacity` entries (minimum one).
    pub fn new(capacity: usize, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                entries: HashMap::new(),
                order: VecDeque::new(),
            }),
            capacity: capacity.max(1),
            clock,
        }
    }

    /// Expiry-aware lookup.
    ///
    /// Returns `None` for an absent or expired entry; the expired entry is
    /// evicted as a side effect.
    pub fn get(&self, id: GameId) -> Option<CacheEntry> {
        let now = self.clock.now();
        {
            let inner = self.inner.read();
            match inner.entries.get(&id) {
                Some(entry) if !entry.is_expired(now) => return Some(entry.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        // Expired: upgrade to a write lock and re-check, since the entry
        // may have been replaced by a fresher one in the meantime.
        let mut inner = self.inner.write();
        if let Some(entry) = inner.entries.get(&id) {
            if !entry.is_expired(now) {
                return Some(entry.clone());
            }
            inner.entries.remove(&id);
            inner.order.retain(|key| *key != id);
            debug!(%id, "evicted expired cache entry");
        }
        None
    }

    /// Unconditional overwrite of any existing entry for the same id.
    ///
    /// At capacity with a new id, evicts oldest-inserted entries to make
    /// room. The capacity bound holds when this returns.
    pub fn put(&self, entry: CacheEntry) {
        let id = entry.id();
        let mut inner = self.inner.write();
        let replaced = inner.entries.insert(id, entry).is_some();
        if replaced {
            inner.order.retain(|key| *key != id);
        }
        inner.order.push_back(id);

        while inner.entries.len() > self.capacity {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
            debug!(id = %oldest, "evicted cache entry over capacity");
        }
    }

    /// Number of entries currently held (expired ones included until read).
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{GameRecord, TtlPolicy};
    use crate::port::SystemClock;
    use chrono::Utc;

    fn entry(id: u64) -> CacheEntry {
        let record = GameRecord {
            id: GameId::new(id),
            best_with: [2].into_iter().collect(),
            recommended_with: [2, 3].into_iter().collect(),
            published_year: "2020".to_string(),
        };
        CacheEntry::from_record(record, &TtlPolicy::default(), Utc::now())
    }

    fn cache(capacity: usize) -> PlayerCountCache {
        PlayerCountCache::new(capacity, Arc::new(SystemClock))
    }

    #[test]
    fn get_returns_fresh_entry() {
        let cache = cache(10);
        cache.put(entry(4));
        let found = cache.get(GameId::new(4)).unwrap();
        assert_eq!(found.id(), GameId::new(4));
    }

    #[test]
    fn get_misses_absent_id() {
        let cache = cache(10);
        assert!(cache.get(GameId::new(1)).is_none());
    }

    #[test]
    fn put_overwrites_existing_entry() {
        let cache = cache(10);
        cache.put(entry(4));
        cache.put(entry(4));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn capacity_bound_holds_after_put() {
        let cache = cache(3);
        for id in 0..10 {
            cache.put(entry(id));
            assert!(cache.len() <= 3);
        }
        // oldest-inserted ids are gone, newest survive
        assert!(cache.get(GameId::new(0)).is_none());
        assert!(cache.get(GameId::new(9)).is_some());
    }

    #[test]
    fn overwrite_does_not_grow_order_queue() {
        let cache = cache(2);
        cache.put(entry(1));
        cache.put(entry(2));
        cache.put(entry(1));
        cache.put(entry(3));
        assert_eq!(cache.len(), 2);
        // overwriting 1 moved it behind 2, so 2 is now the oldest
        assert!(cache.get(GameId::new(2)).is_none());
        assert!(cache.get(GameId::new(1)).is_some());
        assert!(cache.get(GameId::new(3)).is_some());
    }

    #[test]
    fn zero_capacity_is_clamped_to_one() {
        let cache = cache(0);
        cache.put(entry(1));
        assert_eq!(cache.len(), 1);
        cache.put(entry(2));
        assert_eq!(cache.len(), 1);
    }
}
