//! Signal-free cache core for fetched API data.
//!
//! Entries hold type-erased JSON so one map can back every endpoint. The
//! reactive wiring (epoch bumps, spawned fetchers) lives in
//! [`super::client`]; everything here is plain data and natively testable.

use std::collections::HashMap;

use serde_json::Value;

/// Hierarchical cache key, e.g. `["entity-drawer", "details", "ent-1"]`.
pub type QueryKey = Vec<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub status: QueryStatus,
    pub value: Option<Value>,
    pub error: Option<String>,
    pub fetched_at_ms: f64,
    pub stale_after_ms: f64,
    pub invalidated: bool,
}

impl CacheEntry {
    fn idle() -> Self {
        CacheEntry {
            status: QueryStatus::Idle,
            value: None,
            error: None,
            fetched_at_ms: 0.0,
            stale_after_ms: 0.0,
            invalidated: false,
        }
    }

    fn is_fresh(&self, now_ms: f64) -> bool {
        self.status == QueryStatus::Success
            && !self.invalidated
            && now_ms - self.fetched_at_ms < self.stale_after_ms
    }
}

#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CacheEntry>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `key` if it is still within its staleness window and
    /// has not been explicitly invalidated.
    pub fn fresh_value(&self, key: &QueryKey, now_ms: f64) -> Option<&Value> {
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh(now_ms))
            .and_then(|entry| entry.value.as_ref())
    }

    /// Last successful value regardless of freshness. Lets the UI keep
    /// showing stale data while a refetch is in flight.
    pub fn value(&self, key: &QueryKey) -> Option<&Value> {
        self.entries.get(key).and_then(|entry| entry.value.as_ref())
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        self.entries
            .get(key)
            .map(|entry| entry.status)
            .unwrap_or(QueryStatus::Idle)
    }

    /// Marks `key` as loading. Returns `false` if a fetch for the same key is
    /// already in flight, so callers can dedup instead of double-fetching.
    pub fn begin(&mut self, key: &QueryKey) -> bool {
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(CacheEntry::idle);
        if entry.status == QueryStatus::Loading {
            return false;
        }
        entry.status = QueryStatus::Loading;
        entry.error = None;
        true
    }

    pub fn complete(&mut self, key: &QueryKey, value: Value, now_ms: f64, stale_after_ms: f64) {
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(CacheEntry::idle);
        entry.status = QueryStatus::Success;
        entry.value = Some(value);
        entry.error = None;
        entry.fetched_at_ms = now_ms;
        entry.stale_after_ms = stale_after_ms;
        entry.invalidated = false;
    }

    pub fn fail(&mut self, key: &QueryKey, message: String) {
        let entry = self
            .entries
            .entry(key.clone())
            .or_insert_with(CacheEntry::idle);
        entry.status = QueryStatus::Error;
        entry.error = Some(message);
    }

    /// Flags every entry whose key starts with `prefix` as invalidated.
    /// Values stay readable via [`value`](Self::value) until refetched.
    pub fn invalidate_prefix(&mut self, prefix: &[String]) -> usize {
        let mut hit = 0;
        for (key, entry) in self.entries.iter_mut() {
            if key.len() >= prefix.len() && key[..prefix.len()] == *prefix {
                entry.invalidated = true;
                hit += 1;
            }
        }
        hit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn key(parts: &[&str]) -> QueryKey {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn fresh_value_respects_staleness_window() {
        let mut cache = QueryCache::new();
        let k = key(&["graph-view", "graph"]);
        cache.begin(&k);
        cache.complete(&k, json!({"nodes": []}), 1_000.0, 5_000.0);

        assert!(cache.fresh_value(&k, 3_000.0).is_some());
        // Exactly at the window boundary counts as stale
        assert!(cache.fresh_value(&k, 6_000.0).is_none());
        // Stale data is still readable for display
        assert!(cache.value(&k).is_some());
    }

    #[test]
    fn begin_dedups_inflight_fetches() {
        let mut cache = QueryCache::new();
        let k = key(&["graph-view", "stats"]);
        assert!(cache.begin(&k));
        assert!(!cache.begin(&k));
        cache.complete(&k, json!(1), 0.0, 1_000.0);
        assert!(cache.begin(&k));
    }

    #[test]
    fn fail_preserves_previous_value() {
        let mut cache = QueryCache::new();
        let k = key(&["graph-view", "graph"]);
        cache.begin(&k);
        cache.complete(&k, json!({"ok": true}), 0.0, 1_000.0);
        cache.begin(&k);
        cache.fail(&k, "HTTP 500: Internal Server Error".to_string());

        assert_eq!(cache.status(&k), QueryStatus::Error);
        assert_eq!(cache.value(&k), Some(&json!({"ok": true})));
        assert!(cache.fresh_value(&k, 10.0).is_none());
    }

    #[test]
    fn invalidate_prefix_only_touches_namespace() {
        let mut cache = QueryCache::new();
        let graph = key(&["graph-view", "graph"]);
        let details = key(&["entity-drawer", "details", "ent-1"]);
        for k in [&graph, &details] {
            cache.begin(k);
            cache.complete(k, json!(null), 0.0, 60_000.0);
        }

        let hit = cache.invalidate_prefix(&key(&["entity-drawer"]));
        assert_eq!(hit, 1);
        assert!(cache.fresh_value(&details, 1.0).is_none());
        assert!(cache.fresh_value(&graph, 1.0).is_some());
    }

    #[test]
    fn invalidated_entry_recovers_after_refetch() {
        let mut cache = QueryCache::new();
        let k = key(&["graph-view", "graph"]);
        cache.begin(&k);
        cache.complete(&k, json!(1), 0.0, 60_000.0);
        cache.invalidate_prefix(&key(&["graph-view"]));
        assert!(cache.fresh_value(&k, 1.0).is_none());

        cache.begin(&k);
        cache.complete(&k, json!(2), 10.0, 60_000.0);
        assert_eq!(cache.fresh_value(&k, 20.0), Some(&json!(2)));
    }

    #[test]
    fn unknown_key_is_idle() {
        let cache = QueryCache::new();
        assert_eq!(cache.status(&key(&["nope"])), QueryStatus::Idle);
        assert!(cache.value(&key(&["nope"])).is_none());
    }
}
