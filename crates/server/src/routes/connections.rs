use axum::{extract::State, http::StatusCode, Json};
use common::types::Message;
use service::domain::{ConnectionPatch, NewConnection};

use models::node_connection;
use crate::{errors::ApiError, extract::{JsonBody, ResourceId}, state::ServerState};

#[utoipa::path(
    get, path = "/api/connections", tag = "connections",
    responses((status = 200, description = "All connections", body = [crate::openapi::ConnectionDoc]))
)]
pub async fn list(State(state): State<ServerState>) -> Result<Json<Vec<node_connection::Model>>, ApiError> {
    Ok(Json(state.resources.list_connections().await?))
}

#[utoipa::path(
    get, path = "/api/connections/{id}", tag = "connections",
    params(("id" = i32, Path, description = "Connection ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ConnectionDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBody)
    )
)]
pub async fn get(State(state): State<ServerState>, ResourceId(id): ResourceId) -> Result<Json<node_connection::Model>, ApiError> {
    Ok(Json(state.resources.get_connection(id).await?))
}

#[utoipa::path(
    post, path = "/api/connections", tag = "connections",
    request_body = crate::openapi::NewConnectionDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ConnectionDoc),
        (status = 400, description = "Malformed body or unknown node", body = crate::openapi::ErrorBody)
    )
)]
pub async fn create(
    State(state): State<ServerState>,
    JsonBody(input): JsonBody<NewConnection>,
) -> Result<(StatusCode, Json<node_connection::Model>), ApiError> {
    let created = state.resources.create_connection(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put, path = "/api/connections/{id}", tag = "connections",
    params(("id" = i32, Path, description = "Connection ID")),
    request_body = crate::openapi::ConnectionPatchDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ConnectionDoc),
        (status = 400, description = "Malformed body or unknown node", body = crate::openapi::ErrorBody),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBody)
    )
)]
pub async fn update(
    State(state): State<ServerState>,
    ResourceId(id): ResourceId,
    JsonBody(patch): JsonBody<ConnectionPatch>,
) -> Result<Json<node_connection::Model>, ApiError> {
    Ok(Json(state.resources.update_connection(id, patch).await?))
}

#[utoipa::path(
    delete, path = "/api/connections/{id}", tag = "connections",
    params(("id" = i32, Path, description = "Connection ID")),
    responses(
        (status = 200, description = "Deleted", body = crate::openapi::MessageDoc),
        (status = 404, description = "Not Found", body = crate::openapi::ErrorBody)
    )
)]
pub async fn delete(State(state): State<ServerState>, ResourceId(id): ResourceId) -> Result<Json<Message>, ApiError> {
    state.resources.delete_connection(id).await?;
    Ok(Json(Message::new("connection deleted")))
}
