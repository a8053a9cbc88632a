//! Cache keys and staleness windows. Keys are namespaced by the feature that
//! owns the data so invalidation can sweep a whole namespace at once.

use super::cache::QueryKey;

pub const GRAPH_VIEW_NS: &str = "graph-view";
pub const ENTITY_DRAWER_NS: &str = "entity-drawer";

/// Graph snapshot and entity detail stay fresh for five minutes.
pub const STALE_GRAPH_MS: f64 = 5.0 * 60.0 * 1000.0;
pub const STALE_DETAILS_MS: f64 = 5.0 * 60.0 * 1000.0;
/// Store stats churn faster than the snapshot.
pub const STALE_STATS_MS: f64 = 2.0 * 60.0 * 1000.0;
/// The global type histogram changes only on ingest.
pub const STALE_ENTITY_TYPES_MS: f64 = 10.0 * 60.0 * 1000.0;

pub fn graph_snapshot() -> QueryKey {
    vec![GRAPH_VIEW_NS.to_string(), "graph".to_string()]
}

pub fn graph_stats() -> QueryKey {
    vec![GRAPH_VIEW_NS.to_string(), "stats".to_string()]
}

pub fn entity_types() -> QueryKey {
    vec![GRAPH_VIEW_NS.to_string(), "entity-types".to_string()]
}

pub fn entity_details(entity_id: &str) -> QueryKey {
    vec![
        ENTITY_DRAWER_NS.to_string(),
        "details".to_string(),
        entity_id.to_string(),
    ]
}

pub fn graph_view_prefix() -> QueryKey {
    vec![GRAPH_VIEW_NS.to_string()]
}

pub fn entity_drawer_prefix() -> QueryKey {
    vec![ENTITY_DRAWER_NS.to_string()]
}
