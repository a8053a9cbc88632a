//! Shared filtering and coloring rules for the three visualizations.
//!
//! Every view derives its working set from the same snapshot through these
//! functions, so search, type filters, and colors behave identically across
//! tiles, 2D, and 3D.

use std::collections::{BTreeSet, HashSet};

use crate::api::types::{Entity, GraphData, Relationship};

/// Palette for 2D node colors, assigned by position of the node's type in the
/// unfiltered snapshot's type list and cycled when types outnumber colors.
pub const ENTITY_COLORS: [&str; 9] = [
    "#DC143C", "#32CD32", "#800080", "#87CEEB", "#FF4500", "#FFD700", "#00FFFF", "#FF1493",
    "#4B0082",
];

/// Per-type colors for the 3D scene.
pub fn entity_color_3d(entity_type: &str) -> u32 {
    match entity_type {
        "CHARACTER" => 0xff1493,
        "LOCATION" => 0x00ff7f,
        "TEMPORAL" => 0xffd700,
        _ => 0x6366f1,
    }
}

pub const SELECTION_COLOR: u32 = 0xffff00;
pub const SEARCH_MATCH_COLOR: u32 = 0xffffff;
const SEARCH_DIM_FACTOR: f64 = 0.3;

/// Distinct entity types in first-seen order.
///
/// Always derive this from the UNFILTERED snapshot when assigning colors:
/// the index into [`ENTITY_COLORS`] must not shift as filters toggle.
pub fn distinct_entity_types(nodes: &[Entity]) -> Vec<String> {
    let mut seen = HashSet::new();
    nodes
        .iter()
        .filter(|node| seen.insert(node.entity_type.as_str()))
        .map(|node| node.entity_type.clone())
        .collect()
}

pub fn distinct_relation_types(edges: &[Relationship]) -> Vec<String> {
    let mut seen = HashSet::new();
    edges
        .iter()
        .filter(|edge| seen.insert(edge.relation_type.as_str()))
        .map(|edge| edge.relation_type.clone())
        .collect()
}

/// 2D palette color for `entity_type`, looked up against the global type list.
pub fn entity_color(entity_type: &str, global_types: &[String]) -> &'static str {
    let index = global_types
        .iter()
        .position(|t| t == entity_type)
        .unwrap_or(0);
    ENTITY_COLORS[index % ENTITY_COLORS.len()]
}

/// Case-insensitive name match. An empty query matches every entity; a
/// non-empty query never matches an entity with an empty name.
pub fn matches_search(entity: &Entity, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    !entity.name.is_empty()
        && entity
            .name
            .to_lowercase()
            .contains(&query.to_lowercase())
}

fn type_selected(selected: &BTreeSet<String>, entity_type: &str) -> bool {
    selected.is_empty() || selected.contains(entity_type)
}

/// Entities for the tiles grid: search plus type filter, stably sorted by
/// entity type so tiles of one kind cluster together.
pub fn filter_tiles<'a>(
    nodes: &'a [Entity],
    query: &str,
    selected_types: &BTreeSet<String>,
) -> Vec<&'a Entity> {
    let mut tiles: Vec<&Entity> = nodes
        .iter()
        .filter(|node| matches_search(node, query))
        .filter(|node| type_selected(selected_types, node.entity_type.as_str()))
        .collect();
    tiles.sort_by(|a, b| a.entity_type.cmp(&b.entity_type));
    tiles
}

pub struct NetworkSubgraph<'a> {
    pub nodes: Vec<&'a Entity>,
    pub edges: Vec<&'a Relationship>,
}

/// Working set for the 2D and 3D views. Edges touching a filtered-out or
/// absent endpoint are dropped silently; the relation-type filter applies to
/// edges only and never removes nodes.
pub fn filter_network<'a>(
    data: &'a GraphData,
    selected_types: &BTreeSet<String>,
    selected_relations: &BTreeSet<String>,
) -> NetworkSubgraph<'a> {
    let nodes: Vec<&Entity> = data
        .nodes
        .iter()
        .filter(|node| type_selected(selected_types, node.entity_type.as_str()))
        .collect();
    let ids: HashSet<&str> = nodes.iter().map(|node| node.id.as_str()).collect();
    let edges = data
        .edges
        .iter()
        .filter(|edge| {
            selected_relations.is_empty() || selected_relations.contains(&edge.relation_type)
        })
        .filter(|edge| ids.contains(edge.source_id.as_str()) && ids.contains(edge.target_id.as_str()))
        .collect();
    NetworkSubgraph { nodes, edges }
}

/// Final 3D node color after selection and search treatment. Selection wins
/// over search; non-matching nodes are dimmed, not hidden.
pub fn node_display_color(base: u32, selected: bool, search_active: bool, matches: bool) -> u32 {
    if selected {
        SELECTION_COLOR
    } else if search_active {
        if matches {
            SEARCH_MATCH_COLOR
        } else {
            dim(base, SEARCH_DIM_FACTOR)
        }
    } else {
        base
    }
}

fn dim(color: u32, factor: f64) -> u32 {
    let scale = |channel: u32| ((channel as f64 * factor) as u32).min(255);
    (scale((color >> 16) & 0xff) << 16) | (scale((color >> 8) & 0xff) << 8) | scale(color & 0xff)
}

/// CSS hex string for a packed RGB color.
pub fn css_color(color: u32) -> String {
    format!("#{:06x}", color & 0xff_ffff)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::{GraphCounts, TruncationFlags};

    fn entity(id: &str, name: &str, entity_type: &str, confidence: f64) -> Entity {
        Entity {
            id: id.to_string(),
            name: name.to_string(),
            entity_type: entity_type.to_string(),
            confidence,
            aliases: vec![],
            description: String::new(),
            context: String::new(),
            source_chunk_ids: vec![],
            document_sources: vec![],
            created_at: String::new(),
            updated_at: String::new(),
            merge_count: 0,
        }
    }

    fn edge(source: &str, target: &str, relation_type: &str) -> Relationship {
        Relationship {
            source: source.to_string(),
            target: target.to_string(),
            source_id: source.to_string(),
            target_id: target.to_string(),
            relation_type: relation_type.to_string(),
            confidence: 0.5,
            evidence_text: String::new(),
            created_at: String::new(),
            discovery_method: String::new(),
        }
    }

    fn sample_graph() -> GraphData {
        GraphData {
            nodes: vec![
                entity("n1", "Napoleon", "CHARACTER", 0.9),
                entity("n2", "Paris", "LOCATION", 0.8),
                entity("n3", "Waterloo", "LOCATION", 0.7),
                entity("n4", "1815", "TEMPORAL", 0.6),
            ],
            edges: vec![
                edge("n1", "n2", "LIVED_IN"),
                edge("n1", "n3", "FOUGHT_AT"),
                edge("n3", "n4", "OCCURRED_IN"),
                edge("n1", "ghost", "KNOWS"),
            ],
            stats: GraphCounts::default(),
            truncated: TruncationFlags::default(),
            available_entity_types: vec![],
        }
    }

    fn set(types: &[&str]) -> BTreeSet<String> {
        types.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_search_and_filter_shows_everything() {
        let graph = sample_graph();
        let tiles = filter_tiles(&graph.nodes, "", &BTreeSet::new());
        assert_eq!(tiles.len(), graph.nodes.len());
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let graph = sample_graph();
        let tiles = filter_tiles(&graph.nodes, "PAR", &BTreeSet::new());
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].name, "Paris");

        let tiles = filter_tiles(&graph.nodes, "napoleon", &BTreeSet::new());
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].id, "n1");
    }

    #[test]
    fn nameless_entity_matches_only_empty_query() {
        let nodes = vec![entity("n1", "", "CHARACTER", 0.5)];
        assert_eq!(filter_tiles(&nodes, "", &BTreeSet::new()).len(), 1);
        assert!(filter_tiles(&nodes, "a", &BTreeSet::new()).is_empty());
    }

    #[test]
    fn tiles_sort_by_type_and_keep_input_order_within_type() {
        let graph = sample_graph();
        let tiles = filter_tiles(&graph.nodes, "", &BTreeSet::new());
        let types: Vec<&str> = tiles.iter().map(|t| t.entity_type.as_str()).collect();
        assert_eq!(types, vec!["CHARACTER", "LOCATION", "LOCATION", "TEMPORAL"]);
        // Paris before Waterloo, as in the snapshot
        assert_eq!(tiles[1].id, "n2");
        assert_eq!(tiles[2].id, "n3");
    }

    #[test]
    fn type_filter_intersects_with_search() {
        let graph = sample_graph();
        let tiles = filter_tiles(&graph.nodes, "o", &set(&["LOCATION"]));
        assert_eq!(tiles.len(), 1);
        assert_eq!(tiles[0].name, "Waterloo");
    }

    #[test]
    fn network_drops_dangling_edges_silently() {
        let graph = sample_graph();
        let sub = filter_network(&graph, &BTreeSet::new(), &BTreeSet::new());
        assert_eq!(sub.nodes.len(), 4);
        // The edge to the absent "ghost" node is gone
        assert_eq!(sub.edges.len(), 3);
    }

    #[test]
    fn network_type_filter_removes_incident_edges() {
        let graph = sample_graph();
        let sub = filter_network(&graph, &set(&["CHARACTER", "LOCATION"]), &BTreeSet::new());
        assert_eq!(sub.nodes.len(), 3);
        // OCCURRED_IN touched the filtered-out TEMPORAL node
        let rels: Vec<&str> = sub.edges.iter().map(|e| e.relation_type.as_str()).collect();
        assert_eq!(rels, vec!["LIVED_IN", "FOUGHT_AT"]);
    }

    #[test]
    fn relation_filter_limits_edges_but_not_nodes() {
        let graph = sample_graph();
        let sub = filter_network(&graph, &BTreeSet::new(), &set(&["LIVED_IN"]));
        assert_eq!(sub.nodes.len(), 4);
        assert_eq!(sub.edges.len(), 1);
        assert_eq!(sub.edges[0].relation_type, "LIVED_IN");
    }

    #[test]
    fn colors_are_stable_under_filtering() {
        let graph = sample_graph();
        let global = distinct_entity_types(&graph.nodes);
        assert_eq!(global, vec!["CHARACTER", "LOCATION", "TEMPORAL"]);

        let location_color = entity_color("LOCATION", &global);
        // Filtering out CHARACTER must not shift LOCATION onto another color
        let filtered = filter_network(&graph, &set(&["LOCATION", "TEMPORAL"]), &BTreeSet::new());
        let still_global = distinct_entity_types(&graph.nodes);
        assert_eq!(entity_color("LOCATION", &still_global), location_color);
        assert_eq!(filtered.nodes.len(), 3);
    }

    #[test]
    fn palette_cycles_past_nine_types() {
        let types: Vec<String> = (0..12).map(|i| format!("T{i}")).collect();
        assert_eq!(entity_color("T0", &types), entity_color("T9", &types));
        assert_ne!(entity_color("T0", &types), entity_color("T1", &types));
    }

    #[test]
    fn display_color_precedence() {
        let base = entity_color_3d("CHARACTER");
        assert_eq!(node_display_color(base, true, true, false), SELECTION_COLOR);
        assert_eq!(
            node_display_color(base, false, true, true),
            SEARCH_MATCH_COLOR
        );
        assert_eq!(node_display_color(base, false, false, false), base);

        let dimmed = node_display_color(base, false, true, false);
        assert_ne!(dimmed, base);
        // Each channel shrinks
        assert!(dimmed >> 16 <= base >> 16);
    }

    #[test]
    fn css_color_pads_to_six_digits() {
        assert_eq!(css_color(0xff1493), "#ff1493");
        assert_eq!(css_color(0x00ff7f), "#00ff7f");
        assert_eq!(css_color(0x000012), "#000012");
    }
}
