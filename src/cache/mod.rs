//! Page cache
//!
//! Persists extracted page records on disk, one JSON file per URL, keyed by
//! the SHA-256 of the URL. The cache is an accelerator: every failure is
//! logged and treated as a miss, never propagated to the crawl.

mod entry;

pub use entry::{cache_key, CacheEntry, DEFAULT_TTL_HOURS, MAX_TTL_HOURS};

use crate::config::CacheConfig;
use crate::page::PageRecord;
use crate::CacheError;
use chrono::{DateTime, Duration, Utc};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const ENTRY_EXTENSION: &str = "json";

/// File-backed page cache with a fixed time-to-live
#[derive(Debug, Clone)]
pub struct PageCache {
    dir: PathBuf,
    ttl: Duration,
}

impl PageCache {
    /// Creates a cache rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    /// Creates a cache with the default 24 hour TTL
    pub fn with_default_ttl(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir, Duration::hours(DEFAULT_TTL_HOURS))
    }

    /// Creates a cache from configuration
    ///
    /// The TTL is clamped to `1..=MAX_TTL_HOURS` hours, so unvalidated
    /// configurations cannot overflow the duration.
    pub fn from_config(config: &CacheConfig) -> Self {
        let hours = config.ttl_hours.clamp(1, MAX_TTL_HOURS);
        Self::new(config.directory(), Duration::hours(hours))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Looks up a fresh record for `url`
    ///
    /// Returns `None` if no record exists, if it cannot be read or parsed, or if
    /// it is at least one TTL old.
    pub fn get(&self, url: &str) -> Option<PageRecord> {
        self.get_at(url, Utc::now())
    }

    /// Like [`PageCache::get`], judging freshness at `now`
    pub fn get_at(&self, url: &str, now: DateTime<Utc>) -> Option<PageRecord> {
        let path = self.entry_path(url);

        let entry = match read_entry(&path) {
            Ok(Some(entry)) => entry,
            Ok(None) => {
                tracing::trace!("Cache miss for {}", url);
                return None;
            }
            Err(e) => {
                tracing::warn!("Ignoring unreadable cache entry for {}: {}", url, e);
                return None;
            }
        };

        if entry.is_stale_at(now, self.ttl) {
            tracing::debug!(
                "Cache entry for {} is stale (written {})",
                url,
                entry.written_at.to_rfc3339()
            );
            return None;
        }

        tracing::debug!("Cache hit for {}", url);
        Some(entry.page)
    }

    /// Writes or overwrites the record for `url`
    ///
    /// The entry is written to a temporary file and renamed into place, so
    /// readers never observe a partial record. Failures are logged.
    pub fn put(&self, url: &str, record: &PageRecord) {
        let entry = CacheEntry::new(record.clone());
        if let Err(e) = self.write_entry(url, &entry) {
            tracing::warn!("Failed to cache {}: {}", url, e);
        }
    }

    /// Deletes stale and unreadable entries, returning how many were removed
    pub fn prune(&self) -> usize {
        let now = Utc::now();
        self.remove_entries(|path| match read_entry(path) {
            Ok(Some(entry)) => entry.is_stale_at(now, self.ttl),
            Ok(None) => false,
            Err(_) => true,
        })
    }

    /// Deletes every entry, returning how many were removed
    pub fn clear(&self) -> usize {
        self.remove_entries(|_| true)
    }

    fn entry_path(&self, url: &str) -> PathBuf {
        self.dir
            .join(format!("{}.{}", cache_key(url), ENTRY_EXTENSION))
    }

    fn write_entry(&self, url: &str, entry: &CacheEntry) -> Result<(), CacheError> {
        let path = self.entry_path(url);
        let display = path.display().to_string();

        fs::create_dir_all(&self.dir).map_err(|source| CacheError::Write {
            path: self.dir.display().to_string(),
            source,
        })?;

        let body = serde_json::to_vec(entry).map_err(|source| CacheError::Corrupt {
            path: display.clone(),
            source,
        })?;

        let tmp = path.with_extension(format!("{}.{}.tmp", ENTRY_EXTENSION, std::process::id()));
        fs::write(&tmp, body)
            .and_then(|()| fs::rename(&tmp, &path))
            .map_err(|source| {
                let _ = fs::remove_file(&tmp);
                CacheError::Write {
                    path: display,
                    source,
                }
            })
    }

    fn remove_entries<F>(&self, should_remove: F) -> usize
    where
        F: Fn(&Path) -> bool,
    {
        let dir = match fs::read_dir(&self.dir) {
            Ok(dir) => dir,
            Err(e) if e.kind() == ErrorKind::NotFound => return 0,
            Err(e) => {
                tracing::warn!("Failed to list cache directory {}: {}", self.dir.display(), e);
                return 0;
            }
        };

        let mut removed = 0;
        for dir_entry in dir.flatten() {
            let path = dir_entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(ENTRY_EXTENSION) {
                continue;
            }
            if !should_remove(&path) {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!("Failed to remove {}: {}", path.display(), e),
            }
        }

        tracing::info!("Removed {} cache entries from {}", removed, self.dir.display());
        removed
    }
}

/// Reads an entry; `Ok(None)` when the file does not exist
fn read_entry(path: &Path) -> Result<Option<CacheEntry>, CacheError> {
    let display = || path.display().to_string();

    let body = match fs::read(path) {
        Ok(body) => body,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(CacheError::Read {
                path: display(),
                source,
            })
        }
    };

    serde_json::from_slice(&body)
        .map(Some)
        .map_err(|source| CacheError::Corrupt {
            path: display(),
            source,
        })
}
