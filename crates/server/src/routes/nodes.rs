use axum::{extract::State, http::StatusCode, Json};
use common::types::Message;
use service::domain::{NewNode, NodePatch};

use models::node;
use crate::{errors::ApiError, extract::{JsonBody, ResourceId}, state::ServerState};

#[utoipa::path(
    get, path = "/api/nodes", tag = "nodes",
    responses((status = 200, description = "All nodes", body = [crate::openapi::NodeDoc]))
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<node::Model>>, ApiError> {
    Ok(Json(state.resources.list_nodes().await?))
}

#[utoipa::path(
    get, path = "/api/nodes/{id}", tag = "nodes",
    params(("id" = i32, Path, description = "Node ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::NodeDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBody)
    )
)]
pub async fn get(State(state): State<ServerState>, ResourceId(id): ResourceId) -> Result<Json<node::Model>, ApiError> {
    Ok(Json(state.resources.get_node(id).await?))
}

#[utoipa::path(
    post, path = "/api/nodes", tag = "nodes",
    request_body = crate::openapi::NewNodeDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::NodeDoc),
        (status = 400, description = "Malformed body or unknown mind map", body = crate::openapi::ErrorBody)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    JsonBody(input): JsonBody<NewNode>,
) -> Result<(StatusCode, Json<node::Model>), ApiError> {
    let created = state.resources.create_node(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/nodes/{id}", tag = "nodes",
    params(("id" = i32, Path, description = "Node ID")),
    request_body = crate::openapi::NodePatchDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::NodeDoc),
        (status = 400, description = "Malformed body or unknown mind map", body = crate::openapi::ErrorBody),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBody)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    ResourceId(id): ResourceId,
    JsonBody(patch): JsonBody<NodePatch>,
) -> Result<Json<node::Model>, ApiError> {
    Ok(Json(state.resources.update_node(id, patch).await?))
}

#[utoipa::path(
    delete, path = "/api/nodes/{id}", tag = "nodes",
    params(("id" = i32, Path, description = "Node ID")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBody)
    )
)]
pub async fn delete(State(state): State<ServerState>, ResourceId(id): ResourceId) -> Result<Json<Message>, ApiError> {
    state.resources.delete_node(id).await?;
    Ok(Json(Message::new("node deleted")))
}
