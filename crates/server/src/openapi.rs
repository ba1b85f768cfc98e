use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct ErrorBody { pub error: String }

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

#[derive(ToSchema)]
pub struct MindMapDoc {
    pub id: i32,
    pub title: String,
    pub user_id: i32,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct NewMindMapDoc { pub title: String, pub user_id: i32 }

#[derive(ToSchema)]
pub struct MindMapPatchDoc { pub title: Option<String>, pub user_id: Option<i32> }

#[derive(ToSchema)]
pub struct NodeDoc {
    pub id: i32,
    pub map_id: i32,
    pub text: String,
    pub parent_id: Option<i32>,
    pub position: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct NewNodeDoc {
    pub map_id: i32,
    pub text: Option<String>,
    pub parent_id: Option<i32>,
    pub position: Option<String>,
}

/// Absent keys keep the stored value; `parent_id: null` detaches the node.
#[derive(ToSchema)]
pub struct NodePatchDoc {
    pub map_id: Option<i32>,
    pub text: Option<String>,
    pub parent_id: Option<i32>,
    pub position: Option<String>,
}

#[derive(ToSchema)]
pub struct ConnectionDoc {
    pub id: i32,
    pub from_node_id: i32,
    pub to_node_id: i32,
    pub label: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(ToSchema)]
pub struct NewConnectionDoc { pub from_node_id: i32, pub to_node_id: i32, pub label: Option<String> }

/// Absent keys keep the stored value; `label: null` clears it.
#[derive(ToSchema)]
pub struct ConnectionPatchDoc {
    pub from_node_id: Option<i32>,
    pub to_node_id: Option<i32>,
    pub label: Option<String>,
}

#[derive(ToSchema)]
pub struct NodeWithConnectionsDoc {
    pub id: i32,
    pub map_id: i32,
    pub text: String,
    pub parent_id: Option<i32>,
    pub position: String,
    pub created_at: String,
    pub updated_at: String,
    pub from_connections: Vec<ConnectionDoc>,
    pub to_connections: Vec<ConnectionDoc>,
}

#[derive(ToSchema)]
pub struct MindMapTreeDoc {
    pub id: i32,
    pub title: String,
    pub user_id: i32,
    pub created_at: String,
    pub updated_at: String,
    pub nodes: Vec<NodeWithConnectionsDoc>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::mind_maps::list,
        crate::routes::mind_maps::get,
        crate::routes::mind_maps::create,
        crate::routes::mind_maps::update,
        crate::routes::mind_maps::delete,
        crate::routes::nodes::list,
        crate::routes::nodes::get,
        crate::routes::nodes::create,
        crate::routes::nodes::update,
        crate::routes::nodes::delete,
        crate::routes::connections::list,
        crate::routes::connections::get,
        crate::routes::connections::create,
        crate::routes::connections::update,
        crate::routes::connections::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBody,
            MessageDoc,
            MindMapDoc,
            NewMindMapDoc,
            MindMapPatchDoc,
            NodeDoc,
            NewNodeDoc,
            NodePatchDoc,
            ConnectionDoc,
            NewConnectionDoc,
            ConnectionPatchDoc,
            NodeWithConnectionsDoc,
            MindMapTreeDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "mindmaps"),
        (name = "nodes"),
        (name = "connections")
    )
)]
pub struct ApiDoc;
