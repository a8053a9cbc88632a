//! Per-entity endpoints: listing, detail, update, delete.

use super::client::{delete_json, get_json, put_json};
use super::error::ApiError;
use super::types::{Entity, EntityDetails, EntityPatch, MutationReceipt};

pub async fn get_entities(
    limit: Option<u32>,
    offset: Option<u32>,
    entity_type: Option<&str>,
) -> Result<Vec<Entity>, ApiError> {
    let mut query = Vec::new();
    if let Some(limit) = limit {
        query.push(("limit", limit.to_string()));
    }
    if let Some(offset) = offset {
        query.push(("offset", offset.to_string()));
    }
    if let Some(entity_type) = entity_type {
        query.push(("entity_type", entity_type.to_string()));
    }
    get_json("/entities", &query).await
}

pub async fn get_entity(entity_id: &str) -> Result<EntityDetails, ApiError> {
    get_json(&format!("/entities/{entity_id}"), &[]).await
}

pub async fn update_entity(entity_id: &str, patch: &EntityPatch) -> Result<MutationReceipt, ApiError> {
    put_json(&format!("/entities/{entity_id}"), patch).await
}

pub async fn delete_entity(entity_id: &str) -> Result<MutationReceipt, ApiError> {
    delete_json(&format!("/entities/{entity_id}")).await
}
