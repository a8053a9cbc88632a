//! Query Client Tests
//!
//! Tests for the reactive cache wrapper: fetch-through, cache hits, and
//! epoch bumps on invalidation. These are async and rely on the browser
//! microtask queue, so they only run under wasm-bindgen-test.

#![cfg(target_arch = "wasm32")]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gloo_timers::future::TimeoutFuture;
use graph_explorer_frontend::query::{keys, QueryClient};
use leptos::prelude::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
async fn test_fetch_stores_and_then_serves_from_cache() {
    let client = QueryClient::new();
    let calls = Rc::new(Cell::new(0u32));
    let seen = Rc::new(Cell::new(0u32));

    let fetch = |force: bool| {
        let calls = Rc::clone(&calls);
        let seen = Rc::clone(&seen);
        client.fetch(
            keys::graph_stats(),
            60_000.0,
            force,
            move || {
                calls.set(calls.get() + 1);
                async move { Ok::<u32, graph_explorer_frontend::api::ApiError>(42) }
            },
            move |result| {
                assert_eq!(result.unwrap(), 42);
                seen.set(seen.get() + 1);
            },
        );
    };

    fetch(false);
    TimeoutFuture::new(10).await;
    assert_eq!(calls.get(), 1);
    assert_eq!(seen.get(), 1);

    // Within the staleness window the second fetch is a cache hit
    fetch(false);
    TimeoutFuture::new(10).await;
    assert_eq!(calls.get(), 1);
    assert_eq!(seen.get(), 2);

    // Forcing bypasses freshness
    fetch(true);
    TimeoutFuture::new(10).await;
    assert_eq!(calls.get(), 2);
    assert_eq!(seen.get(), 3);
}

#[wasm_bindgen_test]
async fn test_invalidation_bumps_epoch_and_refetches() {
    let client = QueryClient::new();
    let calls = Rc::new(Cell::new(0u32));

    let fetch = || {
        let calls = Rc::clone(&calls);
        client.fetch(
            keys::graph_snapshot(),
            60_000.0,
            false,
            move || {
                calls.set(calls.get() + 1);
                async move { Ok::<bool, graph_explorer_frontend::api::ApiError>(true) }
            },
            |_| {},
        );
    };

    let epoch_before = client.epoch();
    fetch();
    TimeoutFuture::new(10).await;
    assert_eq!(calls.get(), 1);

    client.invalidate_prefix(&keys::graph_view_prefix());
    assert!(client.epoch() > epoch_before);

    // The invalidated entry is no longer fresh, so this refetches
    fetch();
    TimeoutFuture::new(10).await;
    assert_eq!(calls.get(), 2);
}

#[wasm_bindgen_test]
async fn test_late_response_for_previous_selection_is_discarded() {
    let client = QueryClient::new();
    let selected = Rc::new(RefCell::new(Some("ent-a".to_string())));
    let shown = Rc::new(RefCell::new(None::<String>));

    // Mirrors the drawer's guard: a result is applied only if the selection
    // still points at the entity the request was dispatched for.
    let fetch = |id: &'static str, delay_ms: u32| {
        let selected = Rc::clone(&selected);
        let shown = Rc::clone(&shown);
        client.fetch(
            keys::entity_details(id),
            60_000.0,
            false,
            move || async move {
                TimeoutFuture::new(delay_ms).await;
                Ok::<String, graph_explorer_frontend::api::ApiError>(id.to_string())
            },
            move |result| {
                if selected.borrow().as_deref() == Some(id) {
                    *shown.borrow_mut() = Some(result.unwrap());
                }
            },
        );
    };

    fetch("ent-a", 50);
    // The selection moves on before the slow response lands
    *selected.borrow_mut() = Some("ent-b".to_string());
    fetch("ent-b", 10);

    TimeoutFuture::new(100).await;
    assert_eq!(shown.borrow().as_deref(), Some("ent-b"));
}

#[wasm_bindgen_test]
async fn test_unrelated_namespace_survives_invalidation() {
    let client = QueryClient::new();
    let calls = Rc::new(Cell::new(0u32));

    let fetch = || {
        let calls = Rc::clone(&calls);
        client.fetch(
            keys::entity_details("ent-1"),
            60_000.0,
            false,
            move || {
                calls.set(calls.get() + 1);
                async move { Ok::<String, graph_explorer_frontend::api::ApiError>("d".into()) }
            },
            |_| {},
        );
    };

    fetch();
    TimeoutFuture::new(10).await;
    assert_eq!(calls.get(), 1);

    client.invalidate_prefix(&keys::graph_view_prefix());

    // Drawer namespace untouched; still served from cache
    fetch();
    TimeoutFuture::new(10).await;
    assert_eq!(calls.get(), 1);
}
