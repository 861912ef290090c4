//! Cache entry representation
//!
//! A cache entry wraps a page record with the time it was written, which is
//! what TTL checks are computed against.

use crate::page::PageRecord;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Default validity window for cached pages
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// Largest accepted TTL, one hundred years
pub const MAX_TTL_HOURS: i64 = 24 * 365 * 100;

/// A persisted page snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// When the entry was written
    pub written_at: DateTime<Utc>,

    /// The cached page
    pub page: PageRecord,
}

impl CacheEntry {
    /// Creates a new entry stamped with the current time
    pub fn new(page: PageRecord) -> Self {
        Self {
            written_at: Utc::now(),
            page,
        }
    }

    /// Checks if the entry is stale at `now`
    ///
    /// An entry exactly `ttl` old is already stale.
    pub fn is_stale_at(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.written_at >= ttl
    }

    /// Checks if the entry is stale right now
    pub fn is_stale(&self, ttl: Duration) -> bool {
        self.is_stale_at(Utc::now(), ttl)
    }

    /// Returns the age of the entry
    pub fn age(&self) -> Duration {
        Utc::now() - self.written_at
    }
}

/// Derives the filesystem-safe cache key for a URL
///
/// The key is the lowercase hex SHA-256 of the URL string, so it is stable
/// across runs and never contains path separators.
pub fn cache_key(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    hex::encode(hasher.finalize())
}
