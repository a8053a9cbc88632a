//! Shared state for the graph explorer: the fetched snapshot, store stats,
//! search/filter selections, and the currently open entity.
//!
//! Provided by the graph shell and read by the filter panel, the three
//! visualizations, and the entity drawer. The struct is `Copy` so components
//! can move it into closures freely.

use std::collections::BTreeSet;

use leptos::prelude::*;

use crate::api::types::{GraphData, Stats};

#[derive(Clone, Copy)]
pub struct GraphViewState {
    /// Last successfully fetched graph snapshot.
    pub snapshot: RwSignal<Option<GraphData>>,
    /// Store-wide stats for the toolbar.
    pub stats: RwSignal<Option<Stats>>,
    /// True while the snapshot fetch is in flight.
    pub loading: RwSignal<bool>,
    /// Human-readable snapshot fetch failure, if any.
    pub error: RwSignal<Option<String>>,

    /// Case-insensitive name filter shared by all views.
    pub search_query: RwSignal<String>,
    /// Entity types to show. Empty means no filtering.
    pub selected_entity_types: RwSignal<BTreeSet<String>>,
    /// Relation types whose edges to show. Empty means no filtering.
    pub selected_relation_types: RwSignal<BTreeSet<String>>,

    /// Entity open in the detail drawer, `None` when closed.
    pub selected_entity: RwSignal<Option<String>>,

    /// Bumped by [`refetch`](Self::refetch); the shell refetches past the
    /// staleness window whenever this changes.
    pub refetch_tick: RwSignal<u64>,
}

impl GraphViewState {
    pub fn new() -> Self {
        GraphViewState {
            snapshot: RwSignal::new(None),
            stats: RwSignal::new(None),
            loading: RwSignal::new(false),
            error: RwSignal::new(None),
            search_query: RwSignal::new(String::new()),
            selected_entity_types: RwSignal::new(BTreeSet::new()),
            selected_relation_types: RwSignal::new(BTreeSet::new()),
            selected_entity: RwSignal::new(None),
            refetch_tick: RwSignal::new(0),
        }
    }

    /// Forces a snapshot refetch, bypassing the staleness window.
    pub fn refetch(&self) {
        self.refetch_tick.update(|tick| *tick += 1);
    }

    pub fn toggle_entity_type(&self, entity_type: &str) {
        toggle(self.selected_entity_types, entity_type);
    }

    pub fn toggle_relation_type(&self, relation_type: &str) {
        toggle(self.selected_relation_types, relation_type);
    }

    pub fn open_entity(&self, entity_id: &str) {
        self.selected_entity.set(Some(entity_id.to_string()));
    }

    pub fn close_entity(&self) {
        self.selected_entity.set(None);
    }
}

impl Default for GraphViewState {
    fn default() -> Self {
        Self::new()
    }
}

fn toggle(set: RwSignal<BTreeSet<String>>, value: &str) {
    set.update(|set| {
        if !set.remove(value) {
            set.insert(value.to_string());
        }
    });
}

pub fn provide_graph_view_state() -> GraphViewState {
    let state = GraphViewState::new();
    provide_context(state);
    state
}

pub fn use_graph_view_state() -> GraphViewState {
    match use_context::<GraphViewState>() {
        Some(state) => state,
        None => {
            log::error!("use_graph_view_state called outside provide_graph_view_state");
            panic!("graph view state context missing");
        }
    }
}
