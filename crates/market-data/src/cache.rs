//! Response Cache
//!
//! In-memory JSON cache keyed by request signature with a TTL per entry.
//! Expired entries stay around so they can be served when upstream fails.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::time::Instant;

/// Endpoint plus sorted query parameters, e.g. `coins/markets?order=market_cap_desc&vs_currency=usd`
pub fn request_signature(endpoint: &str, params: &[(String, String)]) -> String {
    if params.is_empty() {
        return endpoint.to_string();
    }

    let mut sorted: Vec<_> = params.iter().collect();
    sorted.sort();
    let query: Vec<String> = sorted.iter().map(|(k, v)| format!("{k}={v}")).collect();
    format!("{endpoint}?{}", query.join("&"))
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: Value,
    stored_at: Instant,
    ttl: Duration,
}

impl CacheEntry {
    fn is_fresh(&self, now: Instant) -> bool {
        now.duration_since(self.stored_at) < self.ttl
    }
}

/// Entry counts for the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub total_items: usize,
    pub valid_items: usize,
    pub expired_items: usize,
}

#[derive(Debug, Default)]
pub struct ResponseCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Value stored under `key` if it is still within its TTL
    pub fn get_fresh(&self, key: &str) -> Option<Value> {
        let now = Instant::now();
        self.lock()
            .get(key)
            .filter(|e| e.is_fresh(now))
            .map(|e| e.value.clone())
    }

    /// Value stored under `key` regardless of age
    pub fn get_stale(&self, key: &str) -> Option<Value> {
        self.lock().get(key).map(|e| e.value.clone())
    }

    pub fn insert(&self, key: impl Into<String>, value: Value, ttl: Duration) {
        self.lock().insert(
            key.into(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
                ttl,
            },
        );
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn stats(&self) -> CacheStats {
        let now = Instant::now();
        let entries = self.lock();
        let valid = entries.values().filter(|e| e.is_fresh(now)).count();

        CacheStats {
            total_items: entries.len(),
            valid_items: valid,
            expired_items: entries.len() - valid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn test_signature_sorts_params() {
        let a = request_signature("coins/markets", &params(&[("vs_currency", "usd"), ("page", "1")]));
        let b = request_signature("coins/markets", &params(&[("page", "1"), ("vs_currency", "usd")]));
        assert_eq!(a, b);
        assert_eq!(a, "coins/markets?page=1&vs_currency=usd");
        assert_eq!(request_signature("global", &[]), "global");
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = ResponseCache::new();
        cache.insert("global", json!({"ok": true}), Duration::from_secs(300));

        tokio::time::advance(Duration::from_secs(299)).await;
        assert!(cache.get_fresh("global").is_some());

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(cache.get_fresh("global").is_none());
        assert_eq!(cache.get_stale("global"), Some(json!({"ok": true})));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stats_and_clear() {
        let cache = ResponseCache::new();
        cache.insert("short", json!(1), Duration::from_secs(60));
        cache.insert("long", json!(2), Duration::from_secs(3600));

        tokio::time::advance(Duration::from_secs(120)).await;
        assert_eq!(
            cache.stats(),
            CacheStats {
                total_items: 2,
                valid_items: 1,
                expired_items: 1,
            }
        );

        cache.clear();
        assert_eq!(cache.stats(), CacheStats::default());
    }
}
