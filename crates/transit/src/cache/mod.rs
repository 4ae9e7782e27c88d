//! Response cache shared by every request the client serves.
//!
//! Entries are immutable once written and simply expire, so stores only
//! need to be safe for concurrent reads and writes.

pub mod memory;

use std::sync::Arc;
use std::time::Duration;

use crate::models::record::Record;

pub use memory::MemoryCache;

/// A decoded collection as held in the cache
pub type CachedRecords = Arc<[Record]>;

pub trait CacheStore: Send + Sync {
    /// Fresh entry for `key`, if any
    fn get(&self, key: &str) -> Option<CachedRecords>;

    /// Store `records` for `ttl`, grouped under `tag` for bulk invalidation
    fn insert(&self, key: String, records: CachedRecords, ttl: Duration, tag: &str);

    /// Drop every entry written under `tag`, returning how many were removed
    fn invalidate_tag(&self, tag: &str) -> usize;
}

/// Freshness hint handed to whatever serves a rendered view
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CachePolicy {
    pub max_age: Duration,
}

impl CachePolicy {
    /// Schedule pages carry live predictions
    pub const SCHEDULE: CachePolicy = CachePolicy {
        max_age: Duration::from_secs(60),
    };

    pub const ROUTE_LISTING: CachePolicy = CachePolicy {
        max_age: Duration::from_secs(600),
    };

    /// `Cache-Control` header value
    pub fn cache_control(&self) -> String {
        format!("public, max-age={}", self.max_age.as_secs())
    }
}

/// A store that never retains anything
#[derive(Clone, Copy, Debug, Default)]
pub struct NoCache;

impl CacheStore for NoCache {
    fn get(&self, _key: &str) -> Option<CachedRecords> {
        None
    }

    fn insert(&self, _key: String, _records: CachedRecords, _ttl: Duration, _tag: &str) {}

    fn invalidate_tag(&self, _tag: &str) -> usize {
        0
    }
}
