use serde::{Deserialize, Serialize};

/// An extracted entity as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub confidence: f64,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub source_chunk_ids: Vec<String>,
    #[serde(default)]
    pub document_sources: Vec<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub merge_count: u32,
}

/// A directed relationship between two entities. `source`/`target` are
/// display names; `source_id`/`target_id` are the authoritative keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub target: String,
    pub source_id: String,
    pub target_id: String,
    pub relation_type: String,
    pub confidence: f64,
    #[serde(default)]
    pub evidence_text: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub discovery_method: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GraphCounts {
    pub node_count: u64,
    pub edge_count: u64,
    pub entity_count: u64,
    pub chunk_count: u64,
    pub returned_nodes: u64,
    pub returned_edges: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TruncationFlags {
    pub nodes: bool,
    pub edges: bool,
}

/// A bounded snapshot of the knowledge graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphData {
    pub nodes: Vec<Entity>,
    pub edges: Vec<Relationship>,
    #[serde(default)]
    pub stats: GraphCounts,
    #[serde(default)]
    pub truncated: TruncationFlags,
    #[serde(default)]
    pub available_entity_types: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimilarityThresholds {
    pub name_similarity: f64,
    pub context_similarity: f64,
}

/// Store-wide statistics shown in the shell toolbar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub entities: u64,
    pub chunks: u64,
    pub relationships: u64,
    pub storage_size_mb: f64,
    #[serde(default)]
    pub embedding_model: String,
    #[serde(default)]
    pub thresholds: Option<SimilarityThresholds>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTypeCount {
    #[serde(rename = "type")]
    pub entity_type: String,
    pub count: u64,
}

/// Histogram of entity types across the whole store, not just the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTypes {
    pub entity_types: Vec<EntityTypeCount>,
    pub total_types: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedEntity {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub entity_type: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityMetadata {
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub merge_count: u32,
}

/// Full detail payload for the entity drawer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityDetails {
    pub entity: Entity,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default)]
    pub related_entities: Vec<RelatedEntity>,
    #[serde(default)]
    pub metadata: Option<EntityMetadata>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_results: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub entity: Entity,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub total_found: u64,
}

/// Partial update body for `PUT /entities/{id}`. Only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EntityPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Acknowledgement returned by entity mutations.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MutationReceipt {
    pub status: String,
    pub entity_id: String,
}
