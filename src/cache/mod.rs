//! In-memory cache for CMS query results
//!
//! Results are keyed by the full query text and its encoded parameters and
//! expire after a fixed TTL. Only successful responses are stored.

use moka::future::Cache;
use serde_json::Value;
use std::time::Duration;

use crate::config::CacheConfig;

/// TTL cache for decoded query envelopes
#[derive(Debug, Clone)]
pub struct QueryCache {
    entries: Cache<String, Value>,
}

impl QueryCache {
    pub fn new(ttl: Duration, max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self { entries }
    }

    /// None when caching is disabled or would never hold an entry
    pub fn from_config(config: &CacheConfig) -> Option<Self> {
        if !config.enable || config.max_entries == 0 || config.ttl_secs == 0 {
            return None;
        }
        tracing::debug!(
            ttl_secs = config.ttl_secs,
            max_entries = config.max_entries,
            "Query cache enabled"
        );
        Some(Self::new(
            Duration::from_secs(config.ttl_secs),
            config.max_entries as u64,
        ))
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).await
    }

    pub async fn insert(&self, key: String, value: Value) {
        self.entries.insert(key, value).await;
    }
}

/// Cache key for a query and its encoded parameters
pub fn query_key(query: &str, params: &[(String, String)]) -> String {
    let mut key = String::from(query);
    for (name, value) in params {
        key.push('\0');
        key.push_str(name);
        key.push('=');
        key.push_str(value);
    }
    key
}
