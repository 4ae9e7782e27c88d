//! In-process cache with per-entry expiry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::cache::{CacheStore, CachedRecords};

#[derive(Clone, Debug)]
struct CacheEntry {
    records: CachedRecords,
    expires_at: Instant,
    tag: Arc<str>,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Concurrent in-memory [`CacheStore`]
///
/// Expired entries are dropped when read, or in bulk by [`purge_expired`].
///
/// [`purge_expired`]: MemoryCache::purge_expired
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: DashMap<String, CacheEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every expired entry, returning how many were dropped
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_fresh(now));
        before.saturating_sub(self.entries.len())
    }
}

impl CacheStore for MemoryCache {
    fn get(&self, key: &str) -> Option<CachedRecords> {
        let now = Instant::now();

        if let Some(entry) = self.entries.get(key) {
            if entry.is_fresh(now) {
                return Some(entry.records.clone());
            }
        }

        self.entries.remove_if(key, |_, entry| !entry.is_fresh(now));
        None
    }

    fn insert(&self, key: String, records: CachedRecords, ttl: Duration, tag: &str) {
        let entry = CacheEntry {
            records,
            expires_at: Instant::now() + ttl,
            tag: tag.into(),
        };
        self.entries.insert(key, entry);
    }

    fn invalidate_tag(&self, tag: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| &*entry.tag != tag);
        before.saturating_sub(self.entries.len())
    }
}
