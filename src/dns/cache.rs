//! Bounded host cache
//!
//! A single instance is shared by every resolver facade for the lifetime of
//! the process. Entries never expire; once the configured limit is exceeded
//! the oldest inserted hostname is evicted. Reads and overwrites leave the
//! eviction order untouched, so the order is strictly first-in first-out.
//!
//! Facades are expected to touch the cache from one control context at a
//! time. The internal mutex enforces that when the cache is shared across
//! tokio tasks; it is never held while calling out to receivers.

use super::HostResolution;
use crate::config::DEFAULT_CACHE_SIZE;
use lru::LruCache;
use parking_lot::Mutex;
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Cached lookup outcome
#[derive(Clone, Debug)]
pub enum CachedHost {
    /// Single address stored by the threaded resolver
    Address(IpAddr),
    /// Full multi-address lookup stored by the hostname resolver
    Resolution(Arc<HostResolution>),
}

/// Cache counters
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub insertions: u64,
    pub evictions: u64,
}

#[derive(Default)]
struct Counters {
    hits: AtomicU64,
    misses: AtomicU64,
    insertions: AtomicU64,
    evictions: AtomicU64,
}

struct CacheState {
    entries: LruCache<String, CachedHost>,
    limit: usize,
}

impl CacheState {
    /// Evict oldest entries until the limit holds, returning how many went
    fn trim(&mut self) -> usize {
        let mut evicted = 0;
        while self.entries.len() > self.limit {
            let Some((hostname, _)) = self.entries.pop_lru() else {
                break;
            };
            debug!("DNS cache evicted {}", hostname);
            evicted += 1;
        }
        evicted
    }
}

/// Hostname cache with FIFO eviction
pub struct HostCache {
    state: Mutex<CacheState>,
    counters: Counters,
}

impl HostCache {
    /// Create new cache holding at most `limit` hostnames; 0 disables caching.
    ///
    /// Storage grows per entry, so any limit up to `usize::MAX` is accepted.
    pub fn new(limit: usize) -> Self {
        HostCache {
            state: Mutex::new(CacheState {
                entries: LruCache::unbounded(),
                limit,
            }),
            counters: Counters::default(),
        }
    }

    /// Look up a hostname without affecting eviction order
    pub fn get(&self, hostname: &str) -> Option<CachedHost> {
        let found = self.state.lock().entries.peek(hostname).cloned();

        if found.is_some() {
            self.counters.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.counters.misses.fetch_add(1, Ordering::Relaxed);
        }
        found
    }

    /// Insert or overwrite an entry.
    ///
    /// Overwriting keeps the hostname's original position. Inserting a new
    /// hostname into a full cache evicts the oldest inserted one.
    pub fn put(&self, hostname: String, value: CachedHost) {
        let mut state = self.state.lock();
        if state.limit == 0 {
            return;
        }

        if let Some(slot) = state.entries.peek_mut(&hostname) {
            *slot = value;
            return;
        }

        state.entries.push(hostname, value);
        let evicted = state.trim();
        drop(state);

        self.counters.insertions.fetch_add(1, Ordering::Relaxed);
        self.counters
            .evictions
            .fetch_add(evicted as u64, Ordering::Relaxed);
    }

    /// Change the maximum entry count.
    ///
    /// The new limit is applied immediately: shrinking evicts the oldest
    /// entries right away instead of waiting for the next insertion. 0 drops
    /// everything and turns `put` into a no-op until a non-zero limit is set
    /// again.
    pub fn set_limit(&self, limit: usize) {
        let mut state = self.state.lock();
        state.limit = limit;
        let evicted = state.trim();
        drop(state);

        self.counters
            .evictions
            .fetch_add(evicted as u64, Ordering::Relaxed);
        info!("DNS cache limit set to {}", limit);
    }

    /// Current maximum entry count
    pub fn limit(&self) -> usize {
        self.state.lock().limit
    }

    pub fn is_enabled(&self) -> bool {
        self.limit() > 0
    }

    pub fn contains(&self, hostname: &str) -> bool {
        self.state
            .lock()
            .entries
            .contains(hostname)
    }

    /// Get cache size
    pub fn len(&self) -> usize {
        self.state.lock().entries.len()
    }

    /// Check if cache is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all entries, keeping the limit
    pub fn clear(&self) {
        self.state.lock().entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.counters.hits.load(Ordering::Relaxed),
            misses: self.counters.misses.load(Ordering::Relaxed),
            insertions: self.counters.insertions.load(Ordering::Relaxed),
            evictions: self.counters.evictions.load(Ordering::Relaxed),
        }
    }
}

impl Default for HostCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_SIZE)
    }
}
