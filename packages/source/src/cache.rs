//! Time-boxed memoization for loaded data.
//!
//! The dashboard re-runs its pipeline on every interaction. Fetching the
//! worksheet each time would be slow and hammer the remote, so the loaded
//! value is reused until its time-to-live expires. Callers pass `now`
//! explicitly, which keeps the staleness check a pure function.

use chrono::{DateTime, Duration, Utc};

/// Returns `true` once `ttl` has elapsed since `fetched_at`.
///
/// A zero or negative TTL makes every entry stale immediately. A clock
/// that moved backwards (`now < fetched_at`) keeps the entry fresh.
#[must_use]
pub fn is_stale(fetched_at: DateTime<Utc>, now: DateTime<Utc>, ttl: Duration) -> bool {
    if ttl <= Duration::zero() {
        return true;
    }
    now.signed_duration_since(fetched_at) >= ttl
}

/// A cached value and the moment it was fetched.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The cached value.
    pub data: T,
    /// When the value was fetched.
    pub fetched_at: DateTime<Utc>,
}

/// Single-slot cache holding at most one value with a fixed TTL.
#[derive(Debug, Clone)]
pub struct TtlCache<T> {
    entry: Option<CacheEntry<T>>,
    ttl: Duration,
}

impl<T> TtlCache<T> {
    /// Creates an empty cache with the given time-to-live.
    #[must_use]
    pub const fn new(ttl: Duration) -> Self {
        Self { entry: None, ttl }
    }

    /// The configured time-to-live.
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached value if one exists and is still fresh at `now`.
    #[must_use]
    pub fn get(&self, now: DateTime<Utc>) -> Option<&T> {
        self.entry
            .as_ref()
            .filter(|entry| !is_stale(entry.fetched_at, now, self.ttl))
            .map(|entry| &entry.data)
    }

    /// Replaces the cached value, stamping it with `now`.
    pub fn store(&mut self, data: T, now: DateTime<Utc>) {
        self.entry = Some(CacheEntry {
            data,
            fetched_at: now,
        });
    }

    /// When the current value was fetched, if any value is cached.
    #[must_use]
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.entry.as_ref().map(|entry| entry.fetched_at)
    }

    /// Drops the cached value so the next lookup misses.
    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn entry_is_fresh_until_ttl_elapses() {
        let ttl = Duration::seconds(5);
        assert!(!is_stale(at(0), at(0), ttl));
        assert!(!is_stale(at(0), at(4), ttl));
        assert!(is_stale(at(0), at(5), ttl));
        assert!(is_stale(at(0), at(60), ttl));
    }

    #[test]
    fn zero_ttl_is_always_stale() {
        assert!(is_stale(at(0), at(0), Duration::zero()));
    }

    #[test]
    fn clock_going_backwards_keeps_entry() {
        assert!(!is_stale(at(10), at(3), Duration::seconds(5)));
    }

    #[test]
    fn cache_misses_when_empty_or_expired() {
        let mut cache = TtlCache::new(Duration::seconds(5));
        assert!(cache.get(at(0)).is_none());

        cache.store(vec![1, 2, 3], at(0));
        assert_eq!(cache.get(at(2)), Some(&vec![1, 2, 3]));
        assert_eq!(cache.fetched_at(), Some(at(0)));
        assert!(cache.get(at(5)).is_none());

        cache.store(vec![4], at(5));
        assert_eq!(cache.get(at(6)), Some(&vec![4]));

        cache.invalidate();
        assert!(cache.get(at(6)).is_none());
    }
}
