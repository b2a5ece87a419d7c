//! Response cache with staleness-friendly semantics.
//!
//! Two policies are deliberate and must not be "improved":
//!
//! - TTL is checked at read time; an expired entry is removed by the read
//!   that discovers it.
//! - Capacity eviction at write time removes the entry with the smallest
//!   `created_at`. This is oldest-created eviction, not LRU — a read never
//!   refreshes an entry's position.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use tracing::debug;

use crate::telemetry;

/// Default maximum age at which a cached response may satisfy a lookup.
pub const DEFAULT_TTL_MS: u64 = 300_000;

/// Cache sizing and toggles, read from `performance.*` configuration keys.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum number of cached entries. Default: 100.
    pub max_entries: usize,
    /// Time-to-live in milliseconds. Default: 300,000.
    pub ttl_ms: u64,
    /// When false, every lookup misses and nothing is stored.
    pub enabled: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: 100,
            ttl_ms: DEFAULT_TTL_MS,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    response: String,
    created_at: u64,
}

/// In-memory response cache keyed by provider + endpoint + model + prompt
/// hash.
#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: HashMap<String, CacheEntry>,
    max_entries: usize,
    ttl_ms: u64,
}

impl ResponseCache {
    pub fn new(config: &CacheConfig) -> Self {
        Self {
            entries: HashMap::new(),
            max_entries: config.max_entries.max(1),
            ttl_ms: config.ttl_ms,
        }
    }

    /// Look up a response. Removes the entry when its TTL has lapsed.
    pub fn get(&mut self, key: &str, now_ms: u64) -> Option<String> {
        let expired = match self.entries.get(key) {
            Some(entry) => now_ms.saturating_sub(entry.created_at) >= self.ttl_ms,
            None => {
                metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
                return None;
            }
        };
        if expired {
            self.entries.remove(key);
            metrics::counter!(telemetry::CACHE_MISSES_TOTAL).increment(1);
            debug!(key, "cache entry expired");
            return None;
        }
        metrics::counter!(telemetry::CACHE_HITS_TOTAL).increment(1);
        self.entries.get(key).map(|entry| entry.response.clone())
    }

    /// Store a response, evicting the oldest-created entries while over
    /// capacity.
    pub fn insert(&mut self, key: String, response: String, now_ms: u64) {
        self.entries.insert(
            key,
            CacheEntry {
                response,
                created_at: now_ms,
            },
        );
        while self.entries.len() > self.max_entries {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.created_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    debug!(key, "evicting oldest cache entry");
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }

    /// Drop every entry unconditionally.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Compute the composite cache key for one request.
///
/// The prompt contributes a `DefaultHasher` (SipHash) digest rather than
/// its full text; the hash is stable within a process lifetime, which is
/// all an in-memory cache needs.
pub fn cache_key(provider: &str, endpoint: &str, model: &str, user_prompt: &str) -> String {
    let mut hasher = DefaultHasher::new();
    user_prompt.hash(&mut hasher);
    format!("{provider}:{endpoint}:{model}:{:016x}", hasher.finish())
}
