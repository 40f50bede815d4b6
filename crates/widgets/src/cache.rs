//! TTL cache for provider responses.
//!
//! News and stock payloads change slowly and the providers rate-limit
//! aggressively, so widget services keep the last good payload for a few
//! minutes. Entries are stored as JSON values so one cache serves
//! differently-typed services.

use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::{Duration, Instant};

/// Cache entry with its storage time.
#[derive(Debug, Clone)]
struct CacheEntry {
    stored_at: Instant,
    payload: Value,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() > ttl
    }
}

/// Concurrent response cache with one TTL for all entries.
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Fetch and decode an entry. Expired entries are dropped on read.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        // The read guard must drop before `remove`, or DashMap deadlocks.
        if let Some(entry) = self.entries.get(key) {
            if !entry.is_expired(self.ttl) {
                return serde_json::from_value(entry.payload.clone()).ok();
            }
        } else {
            return None;
        }
        self.entries.remove(key);
        None
    }

    /// Store an entry. Unserializable values are silently skipped; the next
    /// reader just misses.
    pub fn put<T: Serialize>(&self, key: &str, value: &T) {
        if let Ok(payload) = serde_json::to_value(value) {
            self.entries.insert(
                key.to_string(),
                CacheEntry {
                    stored_at: Instant::now(),
                    payload,
                },
            );
        }
    }

    /// Drop every expired entry.
    pub fn purge_expired(&self) {
        let ttl = self.ttl;
        self.entries
            .retain(|_: &String, entry: &mut CacheEntry| !entry.is_expired(ttl));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
