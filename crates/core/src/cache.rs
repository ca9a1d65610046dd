//! Ephemeral result cache.
//!
//! A key/value store with per-entry expiry, used to front slower catalog
//! listings. Expiry is lazy: an expired entry is discovered and dropped on
//! the next read, never by a background sweeper. There is no capacity bound
//! or LRU; time-based expiry is the only eviction.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Time source for expiry checks. Tests inject a manual clock; production
/// code uses [`SystemClock`].
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

#[derive(Clone, Debug)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

/// In-process cache with per-entry TTL. Callers own the key naming scheme
/// (e.g. `"products:all"`).
#[derive(Debug)]
pub struct TtlCache<V, C = SystemClock> {
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
    clock: C,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone, C: Clock> TtlCache<V, C> {
    pub fn with_clock(clock: C) -> Self {
        Self { entries: Mutex::new(HashMap::new()), clock }
    }

    /// Store `value` under `key`, overwriting any existing entry.
    pub fn set(&self, key: impl Into<String>, value: V, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        self.lock().insert(key.into(), CacheEntry { value, expires_at });
    }

    /// Return the live value for `key`. An entry at or past its expiry is
    /// removed and reported as absent.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.lock();

        match entries.get(key) {
            Some(entry) if now < entry.expires_at => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Remove `key` unconditionally. Removing an absent key is a no-op.
    pub fn remove(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Return the live value for `key`, computing and storing it when absent
    /// or expired. The interior lock is held across the computation, so a
    /// given cache recomputes at most one key at a time and concurrent
    /// readers of the same expired key cannot stampede.
    pub fn get_or_insert_with(
        &self,
        key: &str,
        ttl: Duration,
        compute: impl FnOnce() -> V,
    ) -> V {
        let now = self.clock.now();
        let mut entries = self.lock();

        if let Some(entry) = entries.get(key) {
            if now < entry.expires_at {
                return entry.value.clone();
            }
        }

        let value = compute();
        entries.insert(
            key.to_owned(),
            CacheEntry { value: value.clone(), expires_at: now + ttl },
        );
        value
    }

    /// Number of stored entries, expired or not. Expired entries linger
    /// until read.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        // Cached values are plain data; a panic mid-insert cannot leave an
        // entry half-written, so a poisoned lock is still usable.
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    use super::{Clock, TtlCache};

    struct ManualClock {
        now: Mutex<Instant>,
    }

    impl ManualClock {
        fn new() -> Self {
            Self { now: Mutex::new(Instant::now()) }
        }

        fn advance(&self, by: Duration) {
            let mut now = self.now.lock().expect("clock lock");
            *now += by;
        }
    }

    impl Clock for &ManualClock {
        fn now(&self) -> Instant {
            *self.now.lock().expect("clock lock")
        }
    }

    #[test]
    fn get_returns_value_before_expiry() {
        let clock = ManualClock::new();
        let cache: TtlCache<String, _> = TtlCache::with_clock(&clock);

        cache.set("products:all", "listing".to_string(), Duration::from_millis(1000));
        assert_eq!(cache.get("products:all").as_deref(), Some("listing"));
    }

    #[test]
    fn expired_entry_is_absent_and_removed() {
        let clock = ManualClock::new();
        let cache: TtlCache<u32, _> = TtlCache::with_clock(&clock);

        cache.set("k", 7, Duration::from_millis(1000));
        clock.advance(Duration::from_millis(1001));

        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn set_overwrites_existing_entry() {
        let clock = ManualClock::new();
        let cache: TtlCache<u32, _> = TtlCache::with_clock(&clock);

        cache.set("k", 1, Duration::from_millis(100));
        cache.set("k", 2, Duration::from_millis(100));

        assert_eq!(cache.get("k"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn remove_is_noop_for_absent_key() {
        let cache: TtlCache<u32> = TtlCache::new();
        cache.remove("never-set");
        assert!(cache.is_empty());
    }

    #[test]
    fn get_or_insert_with_recomputes_only_when_expired() {
        let clock = ManualClock::new();
        let cache: TtlCache<u32, _> = TtlCache::with_clock(&clock);

        let first = cache.get_or_insert_with("k", Duration::from_millis(500), || 1);
        let second = cache.get_or_insert_with("k", Duration::from_millis(500), || 2);
        assert_eq!((first, second), (1, 1));

        clock.advance(Duration::from_millis(501));
        let third = cache.get_or_insert_with("k", Duration::from_millis(500), || 3);
        assert_eq!(third, 3);
    }
}
