use axum::{routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::Health;
use configs::WebConfig;

use crate::openapi::ApiDoc;
use crate::state::ServerState;

pub mod connections;
pub mod mind_maps;
pub mod nodes;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// JSON API routes only, bound to `state`.
pub fn api_router(state: ServerState) -> Router {
    Router::new()
        .route("/api/mindmaps", get(mind_maps::list).post(mind_maps::create))
        .route(
            "/api/mindmaps/:id",
            get(mind_maps::get).put(mind_maps::update).delete(mind_maps::delete),
        )
        .route("/api/nodes", get(nodes::list).post(nodes::create))
        .route("/api/nodes/:id", get(nodes::get).put(nodes::update).delete(nodes::delete))
        .route("/api/connections", get(connections::list).post(connections::create))
        .route(
            "/api/connections/:id",
            get(connections::get).put(connections::update).delete(connections::delete),
        )
        .with_state(state)
}

/// Build the full application router: HTML shell, static assets, API and docs.
pub fn build_router(state: ServerState, cors: CorsLayer, web: &WebConfig) -> Router {
    // Public routes (shell + static + health)
    let public = Router::new()
        .route_service("/", ServeFile::new(&web.index_template))
        .nest_service("/static", ServeDir::new(&web.static_dir))
        .route("/health", get(health));

    let docs = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi());

    // Compose
    public
        .merge(api_router(state))
        .merge(docs)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // One INFO span per request with method and path
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // Request received
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // Response sent, with status and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx and other failures at ERROR
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
