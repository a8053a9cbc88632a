//! Graph-level endpoints: snapshot, semantic search, store stats, and the
//! entity-type histogram.

use super::client::{get_json, post_json};
use super::error::ApiError;
use super::types::{EntityTypes, GraphData, SearchQuery, SearchResult, Stats};

/// Fetches a bounded graph snapshot. `entity_types` is a comma-separated
/// server-side filter; `None` returns every type.
pub async fn get_graph_data(
    max_nodes: u32,
    max_edges: u32,
    entity_types: Option<&str>,
) -> Result<GraphData, ApiError> {
    let mut query = vec![
        ("max_nodes", max_nodes.to_string()),
        ("max_edges", max_edges.to_string()),
    ];
    if let Some(types) = entity_types {
        query.push(("entity_types", types.to_string()));
    }
    get_json("/graph", &query).await
}

pub async fn search_entities(query: &SearchQuery) -> Result<SearchResult, ApiError> {
    post_json("/search", query).await
}

pub async fn get_stats() -> Result<Stats, ApiError> {
    get_json("/stats", &[]).await
}

pub async fn get_entity_types() -> Result<EntityTypes, ApiError> {
    get_json("/entity-types", &[]).await
}
