use axum::{extract::State, http::StatusCode, Json};
use common::types::Message;
use service::domain::{MindMapPatch, MindMapTree, NewMindMap};
use tracing::info;

use models::mind_map;
use crate::{errors::ApiError, extract::{JsonBody, ResourceId}, state::ServerState};

#[utoipa::path(
    get, path = "/api/mindmaps", tag = "mindmaps",
    responses(
        (status = 200, description = "All mind maps", body = [crate::openapi::MindMapDoc]),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorBody)
    )
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<mind_map::Model>>, ApiError> {
    let maps = state.resources.list_mind_maps().await?;
    info!(count = maps.len(), "list mind maps");
    Ok(Json(maps))
}

#[utoipa::path(
    get, path = "/api/mindmaps/{id}", tag = "mindmaps",
    params(("id" = i32, Path, description = "Mind map ID")),
    responses(
        (status = 200, description = "Mind map with nodes and their connections", body = crate::openapi::MindMapTreeDoc),
        (status = 400, description = "Malformed id", body = crate::openapi::ErrorBody),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBody)
    )
)]
pub async fn get(State(state): State<ServerState>, ResourceId(id): ResourceId) -> Result<Json<MindMapTree>, ApiError> {
    Ok(Json(state.resources.get_mind_map(id).await?))
}

#[utoipa::path(
    post, path = "/api/mindmaps", tag = "mindmaps",
    request_body = crate::openapi::NewMindMapDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::MindMapDoc),
        (status = 400, description = "Malformed body or unknown user", body = crate::openapi::ErrorBody),
        (status = 500, description = "Store failure", body = crate::openapi::ErrorBody)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    JsonBody(input): JsonBody<NewMindMap>,
) -> Result<(StatusCode, Json<mind_map::Model>), ApiError> {
    let created = state.resources.create_mind_map(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/mindmaps/{id}", tag = "mindmaps",
    params(("id" = i32, Path, description = "Mind map ID")),
    request_body = crate::openapi::MindMapPatchDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::MindMapDoc),
        (status = 400, description = "Malformed body or unknown user", body = crate::openapi::ErrorBody),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBody)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    ResourceId(id): ResourceId,
    JsonBody(patch): JsonBody<MindMapPatch>,
) -> Result<Json<mind_map::Model>, ApiError> {
    Ok(Json(state.resources.update_mind_map(id, patch).await?))
}

#[utoipa::path(
    delete, path = "/api/mindmaps/{id}", tag = "mindmaps",
    params(("id" = i32, Path, description = "Mind map ID")),
    responses(
        (status = 200, description = "Deleted together with its nodes", body = crate::openapi::MessageDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBody)
    )
)]
pub async fn delete(State(state): State<ServerState>, ResourceId(id): ResourceId) -> Result<Json<Message>, ApiError> {
    state.resources.delete_mind_map(id).await?;
    Ok(Json(Message::new("mind map deleted")))
}
