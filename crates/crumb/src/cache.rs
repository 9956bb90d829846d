//! Time-bounded caching of schemas and fetched rows.

use crumb_core::{driver::Row, Schema};

use ahash::AHasher;
use std::{
    hash::Hasher,
    sync::Arc,
    time::{Duration, Instant},
};

/// A get/set store with per-entry TTL.
///
/// Entries are never invalidated before they expire, and concurrent misses
/// on the same key all run their query.
pub trait Cache: Send + Sync + 'static {
    fn get(&self, key: &str) -> Option<Cached>;

    fn set(&self, key: &str, value: Cached, ttl: Duration);
}

#[derive(Debug, Clone)]
pub enum Cached {
    Schema(Arc<Schema>),
    Rows(Arc<Vec<Row>>),
}

/// In-process cache backed by `moka`.
#[derive(Clone)]
pub struct MemoryCache {
    entries: moka::sync::Cache<String, Entry>,
}

#[derive(Clone)]
struct Entry {
    value: Cached,
    expires_at: Instant,
}

impl MemoryCache {
    pub fn new() -> MemoryCache {
        MemoryCache::with_capacity(10_000)
    }

    /// A cache holding at most `capacity` entries.
    pub fn with_capacity(capacity: u64) -> MemoryCache {
        MemoryCache {
            entries: moka::sync::Cache::builder().max_capacity(capacity).build(),
        }
    }
}

impl Default for MemoryCache {
    fn default() -> Self {
        MemoryCache::new()
    }
}

impl std::fmt::Debug for MemoryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryCache")
            .field("entries", &self.entries.entry_count())
            .finish_non_exhaustive()
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<Cached> {
        let entry = self.entries.get(key)?;

        if entry.expires_at <= Instant::now() {
            self.entries.invalidate(key);
            return None;
        }

        Some(entry.value)
    }

    fn set(&self, key: &str, value: Cached, ttl: Duration) {
        self.entries.insert(
            key.to_string(),
            Entry {
                value,
                expires_at: Instant::now() + ttl,
            },
        );
    }
}

/// Derives a cache key from its parts.
pub fn key(parts: &[&str]) -> String {
    let mut hasher = AHasher::default();

    for part in parts {
        hasher.write(part.as_bytes());
        // Separator so that ("ab", "c") and ("a", "bc") differ
        hasher.write_u8(0xff);
    }

    format!("{:016x}", hasher.finish())
}
