//! Reactive wrapper around [`QueryCache`], provided once at the app root.
//!
//! Components never touch the cache directly; they go through
//! [`QueryClient::fetch`], which serves fresh cached data synchronously and
//! otherwise spawns the fetcher. Invalidation bumps a reactive epoch so
//! effects that depend on cached data re-run.

use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::cache::{QueryCache, QueryKey};
use crate::api::ApiError;
use crate::utils::now_ms;

#[derive(Clone, Copy)]
pub struct QueryClient {
    cache: StoredValue<QueryCache>,
    epoch: RwSignal<u64>,
}

impl QueryClient {
    pub fn new() -> Self {
        QueryClient {
            cache: StoredValue::new(QueryCache::new()),
            epoch: RwSignal::new(0),
        }
    }

    /// Monotonic counter bumped on every invalidation. Reading it inside an
    /// effect subscribes the effect to cache invalidations.
    pub fn epoch(&self) -> u64 {
        self.epoch.get()
    }

    /// Resolves `key` through the cache.
    ///
    /// Fresh data is delivered to `on_result` synchronously without a network
    /// round trip. Otherwise the fetcher runs via `spawn_local`; a concurrent
    /// fetch for the same key is deduplicated and this call becomes a no-op.
    /// `force` bypasses freshness (used by the refresh button) but still
    /// dedups against in-flight requests.
    pub fn fetch<T, F, Fut, C>(
        &self,
        key: QueryKey,
        stale_after_ms: f64,
        force: bool,
        fetcher: F,
        on_result: C,
    ) where
        T: Serialize + DeserializeOwned + 'static,
        F: FnOnce() -> Fut + 'static,
        Fut: Future<Output = Result<T, ApiError>> + 'static,
        C: Fn(Result<T, ApiError>) + 'static,
    {
        if !force {
            let cached = self
                .cache
                .with_value(|cache| cache.fresh_value(&key, now_ms()).cloned());
            if let Some(value) = cached {
                match serde_json::from_value::<T>(value) {
                    Ok(typed) => {
                        on_result(Ok(typed));
                        return;
                    }
                    Err(err) => {
                        // A shape mismatch means the cached payload predates a
                        // type change; fall through and refetch.
                        log::warn!("cache entry for {key:?} failed to decode: {err}");
                    }
                }
            }
        }

        let started = self.cache.try_update_value(|cache| cache.begin(&key));
        if started != Some(true) {
            return;
        }

        let cache = self.cache;
        spawn_local(async move {
            match fetcher().await {
                Ok(payload) => {
                    match serde_json::to_value(&payload) {
                        Ok(value) => cache.update_value(|c| {
                            c.complete(&key, value, now_ms(), stale_after_ms)
                        }),
                        Err(err) => cache.update_value(|c| {
                            c.fail(&key, format!("failed to cache response: {err}"))
                        }),
                    }
                    on_result(Ok(payload));
                }
                Err(err) => {
                    cache.update_value(|c| c.fail(&key, err.to_string()));
                    on_result(Err(err));
                }
            }
        });
    }

    /// Invalidates every cached entry under `prefix` and bumps the epoch so
    /// dependent effects refetch.
    pub fn invalidate_prefix(&self, prefix: &[String]) {
        let hit = self
            .cache
            .try_update_value(|cache| cache.invalidate_prefix(prefix))
            .unwrap_or(0);
        if hit > 0 {
            log::debug!("invalidated {hit} cache entries under {prefix:?}");
        }
        self.epoch.update(|e| *e += 1);
    }
}

impl Default for QueryClient {
    fn default() -> Self {
        Self::new()
    }
}

pub fn provide_query_client() {
    provide_context(QueryClient::new());
}

pub fn use_query_client() -> QueryClient {
    match use_context::<QueryClient>() {
        Some(client) => client,
        None => {
            log::error!("use_query_client called outside provide_query_client");
            panic!("query client context missing");
        }
    }
}
