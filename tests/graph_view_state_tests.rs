//! Graph View State Tests
//!
//! Tests for the shared explorer state: filter toggles, search, selection,
//! and the refetch tick.

#![cfg(target_arch = "wasm32")]

use graph_explorer_frontend::services::graph_view_state::GraphViewState;
use leptos::prelude::*;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

// ============================================================================
// Defaults
// ============================================================================

#[wasm_bindgen_test]
fn test_initial_state_is_empty() {
    let state = GraphViewState::new();
    assert!(state.snapshot.get_untracked().is_none());
    assert!(state.stats.get_untracked().is_none());
    assert!(!state.loading.get_untracked());
    assert!(state.error.get_untracked().is_none());
    assert_eq!(state.search_query.get_untracked(), "");
    assert!(state.selected_entity_types.get_untracked().is_empty());
    assert!(state.selected_relation_types.get_untracked().is_empty());
    assert!(state.selected_entity.get_untracked().is_none());
    assert_eq!(state.refetch_tick.get_untracked(), 0);
}

// ============================================================================
// Filter toggles
// ============================================================================

#[wasm_bindgen_test]
fn test_toggle_entity_type_adds_then_removes() {
    let state = GraphViewState::new();

    state.toggle_entity_type("CHARACTER");
    assert!(state
        .selected_entity_types
        .get_untracked()
        .contains("CHARACTER"));

    state.toggle_entity_type("LOCATION");
    assert_eq!(state.selected_entity_types.get_untracked().len(), 2);

    // Toggling twice returns to the starting selection
    state.toggle_entity_type("CHARACTER");
    let selected = state.selected_entity_types.get_untracked();
    assert!(!selected.contains("CHARACTER"));
    assert!(selected.contains("LOCATION"));
}

#[wasm_bindgen_test]
fn test_toggle_relation_type_is_independent_of_entity_types() {
    let state = GraphViewState::new();

    state.toggle_relation_type("LOCATED_IN");
    assert!(state
        .selected_relation_types
        .get_untracked()
        .contains("LOCATED_IN"));
    assert!(state.selected_entity_types.get_untracked().is_empty());

    state.toggle_relation_type("LOCATED_IN");
    assert!(state.selected_relation_types.get_untracked().is_empty());
}

// ============================================================================
// Selection and search
// ============================================================================

#[wasm_bindgen_test]
fn test_open_and_close_entity() {
    let state = GraphViewState::new();

    state.open_entity("ent-1");
    assert_eq!(
        state.selected_entity.get_untracked().as_deref(),
        Some("ent-1")
    );

    // Opening another entity replaces the selection
    state.open_entity("ent-2");
    assert_eq!(
        state.selected_entity.get_untracked().as_deref(),
        Some("ent-2")
    );

    state.close_entity();
    assert!(state.selected_entity.get_untracked().is_none());
}

#[wasm_bindgen_test]
fn test_search_query_roundtrip() {
    let state = GraphViewState::new();
    state.search_query.set("napoleon".to_string());
    assert_eq!(state.search_query.get_untracked(), "napoleon");
}

// ============================================================================
// Refetch tick
// ============================================================================

#[wasm_bindgen_test]
fn test_refetch_bumps_tick_monotonically() {
    let state = GraphViewState::new();
    state.refetch();
    state.refetch();
    assert_eq!(state.refetch_tick.get_untracked(), 2);
}
