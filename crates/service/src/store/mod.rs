//! Persistence seam for the mind map resources.
//!
//! `ResourceStore` is object safe so the HTTP layer can hold an
//! `Arc<dyn ResourceStore>` chosen at startup.

use async_trait::async_trait;
use models::{mind_map, node, node_connection, user};

use crate::domain::{ConnectionPatch, MindMapPatch, MindMapTree, NewConnection, NewMindMap, NewNode, NodePatch};
use crate::errors::ServiceError;

pub mod memory;
pub mod seaorm;

/// Row-level operations. Lookups and updates return `None` for a missing id,
/// deletes return `false`; referential checks live in `ResourceService`.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn create_user(&self, username: &str, password_hash: String) -> Result<user::Model, ServiceError>;
    async fn find_user_by_username(&self, username: &str) -> Result<Option<user::Model>, ServiceError>;
    async fn user_exists(&self, id: i32) -> Result<bool, ServiceError>;

    async fn list_mind_maps(&self) -> Result<Vec<mind_map::Model>, ServiceError>;
    async fn find_mind_map(&self, id: i32) -> Result<Option<mind_map::Model>, ServiceError>;
    /// Map plus its nodes and every connection touching them.
    async fn load_mind_map_tree(&self, id: i32) -> Result<Option<MindMapTree>, ServiceError>;
    async fn insert_mind_map(&self, input: NewMindMap) -> Result<mind_map::Model, ServiceError>;
    async fn update_mind_map(&self, id: i32, patch: MindMapPatch) -> Result<Option<mind_map::Model>, ServiceError>;
    /// Removes connections touching the map's nodes, the nodes, then the map, atomically.
    async fn delete_mind_map(&self, id: i32) -> Result<bool, ServiceError>;

    async fn list_nodes(&self) -> Result<Vec<node::Model>, ServiceError>;
    async fn find_node(&self, id: i32) -> Result<Option<node::Model>, ServiceError>;
    async fn insert_node(&self, input: NewNode) -> Result<node::Model, ServiceError>;
    async fn update_node(&self, id: i32, patch: NodePatch) -> Result<Option<node::Model>, ServiceError>;
    /// Removes the node's connections, detaches its children, then removes the node, atomically.
    async fn delete_node(&self, id: i32) -> Result<bool, ServiceError>;

    async fn list_connections(&self) -> Result<Vec<node_connection::Model>, ServiceError>;
    async fn find_connection(&self, id: i32) -> Result<Option<node_connection::Model>, ServiceError>;
    async fn insert_connection(&self, input: NewConnection) -> Result<node_connection::Model, ServiceError>;
    async fn update_connection(&self, id: i32, patch: ConnectionPatch) -> Result<Option<node_connection::Model>, ServiceError>;
    async fn delete_connection(&self, id: i32) -> Result<bool, ServiceError>;
}
