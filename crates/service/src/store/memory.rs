//! In-process store with the same cascade rules as the PostgreSQL one.
//! Used by router tests and anywhere a database is not wanted.

use std::collections::BTreeMap;

use async_trait::async_trait;
use sea_orm::{entity::prelude::DateTimeWithTimeZone, TryIntoModel};
use tokio::sync::Mutex;

use models::{mind_map, node, node_connection, user};

use super::ResourceStore;
use crate::domain::{ConnectionPatch, MindMapPatch, MindMapTree, NewConnection, NewMindMap, NewNode, NodePatch};
use crate::errors::ServiceError;

#[derive(Default)]
struct Tables {
    next_id: i32,
    users: BTreeMap<i32, user::Model>,
    mind_maps: BTreeMap<i32, mind_map::Model>,
    nodes: BTreeMap<i32, node::Model>,
    connections: BTreeMap<i32, node_connection::Model>,
}

impl Tables {
    /// One sequence shared by all tables; ids are positive and never reused.
    fn allocate(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn drop_connections_touching(&mut self, node_id: i32) {
        self.connections.retain(|_, c| c.from_node_id != node_id && c.to_node_id != node_id);
    }
}

fn now() -> DateTimeWithTimeZone {
    chrono::Utc::now().into()
}

#[derive(Default)]
pub struct InMemoryResourceStore {
    tables: Mutex<Tables>,
}

impl InMemoryResourceStore {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl ResourceStore for InMemoryResourceStore {
    async fn create_user(&self, username: &str, password_hash: String) -> Result<user::Model, ServiceError> {
        models::user::validate_username(username)?;
        let mut t = self.tables.lock().await;
        let username = username.trim().to_string();
        if t.users.values().any(|u| u.username == username) {
            return Err(ServiceError::Validation(format!("username {} already taken", username)));
        }
        let ts = now();
        let id = t.allocate();
        let row = user::Model { id, username, password_hash, created_at: ts, updated_at: ts };
        t.users.insert(id, row.clone());
        Ok(row)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<user::Model>, ServiceError> {
        let t = self.tables.lock().await;
        Ok(t.users.values().find(|u| u.username == username.trim()).cloned())
    }

    async fn user_exists(&self, id: i32) -> Result<bool, ServiceError> {
        Ok(self.tables.lock().await.users.contains_key(&id))
    }

    async fn list_mind_maps(&self) -> Result<Vec<mind_map::Model>, ServiceError> {
        Ok(self.tables.lock().await.mind_maps.values().cloned().collect())
    }

    async fn find_mind_map(&self, id: i32) -> Result<Option<mind_map::Model>, ServiceError> {
        Ok(self.tables.lock().await.mind_maps.get(&id).cloned())
    }

    async fn load_mind_map_tree(&self, id: i32) -> Result<Option<MindMapTree>, ServiceError> {
        let t = self.tables.lock().await;
        let Some(map) = t.mind_maps.get(&id).cloned() else { return Ok(None) };
        let nodes: Vec<node::Model> = t.nodes.values().filter(|n| n.map_id == id).cloned().collect();
        let connections = t
            .connections
            .values()
            .filter(|c| nodes.iter().any(|n| n.id == c.from_node_id || n.id == c.to_node_id))
            .cloned()
            .collect();
        Ok(Some(MindMapTree::assemble(map, nodes, connections)))
    }

    async fn insert_mind_map(&self, input: NewMindMap) -> Result<mind_map::Model, ServiceError> {
        let mut t = self.tables.lock().await;
        let ts = now();
        let id = t.allocate();
        let row = mind_map::Model { id, title: input.title, user_id: input.user_id, created_at: ts, updated_at: ts };
        t.mind_maps.insert(id, row.clone());
        Ok(row)
    }

    async fn update_mind_map(&self, id: i32, patch: MindMapPatch) -> Result<Option<mind_map::Model>, ServiceError> {
        let mut t = self.tables.lock().await;
        let Some(existing) = t.mind_maps.get(&id).cloned() else { return Ok(None) };
        let mut am: mind_map::ActiveModel = existing.into();
        patch.apply(&mut am);
        let mut row = am.try_into_model()?;
        row.updated_at = now();
        t.mind_maps.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn delete_mind_map(&self, id: i32) -> Result<bool, ServiceError> {
        let mut t = self.tables.lock().await;
        if t.mind_maps.remove(&id).is_none() {
            return Ok(false);
        }
        let node_ids: Vec<i32> = t.nodes.values().filter(|n| n.map_id == id).map(|n| n.id).collect();
        for node_id in node_ids {
            t.drop_connections_touching(node_id);
            t.nodes.remove(&node_id);
        }
        Ok(true)
    }

    async fn list_nodes(&self) -> Result<Vec<node::Model>, ServiceError> {
        Ok(self.tables.lock().await.nodes.values().cloned().collect())
    }

    async fn find_node(&self, id: i32) -> Result<Option<node::Model>, ServiceError> {
        Ok(self.tables.lock().await.nodes.get(&id).cloned())
    }

    async fn insert_node(&self, input: NewNode) -> Result<node::Model, ServiceError> {
        let mut t = self.tables.lock().await;
        let ts = now();
        let id = t.allocate();
        let row = node::Model {
            id,
            map_id: input.map_id,
            text: input.text,
            parent_id: input.parent_id,
            position: input.position,
            created_at: ts,
            updated_at: ts,
        };
        t.nodes.insert(id, row.clone());
        Ok(row)
    }

    async fn update_node(&self, id: i32, patch: NodePatch) -> Result<Option<node::Model>, ServiceError> {
        let mut t = self.tables.lock().await;
        let Some(existing) = t.nodes.get(&id).cloned() else { return Ok(None) };
        let mut am: node::ActiveModel = existing.into();
        patch.apply(&mut am);
        let mut row = am.try_into_model()?;
        row.updated_at = now();
        t.nodes.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn delete_node(&self, id: i32) -> Result<bool, ServiceError> {
        let mut t = self.tables.lock().await;
        if t.nodes.remove(&id).is_none() {
            return Ok(false);
        }
        t.drop_connections_touching(id);
        let ts = now();
        for child in t.nodes.values_mut().filter(|n| n.parent_id == Some(id)) {
            child.parent_id = None;
            child.updated_at = ts;
        }
        Ok(true)
    }

    async fn list_connections(&self) -> Result<Vec<node_connection::Model>, ServiceError> {
        Ok(self.tables.lock().await.connections.values().cloned().collect())
    }

    async fn find_connection(&self, id: i32) -> Result<Option<node_connection::Model>, ServiceError> {
        Ok(self.tables.lock().await.connections.get(&id).cloned())
    }

    async fn insert_connection(&self, input: NewConnection) -> Result<node_connection::Model, ServiceError> {
        let mut t = self.tables.lock().await;
        let ts = now();
        let id = t.allocate();
        let row = node_connection::Model {
            id,
            from_node_id: input.from_node_id,
            to_node_id: input.to_node_id,
            label: input.label,
            created_at: ts,
            updated_at: ts,
        };
        t.connections.insert(id, row.clone());
        Ok(row)
    }

    async fn update_connection(&self, id: i32, patch: ConnectionPatch) -> Result<Option<node_connection::Model>, ServiceError> {
        let mut t = self.tables.lock().await;
        let Some(existing) = t.connections.get(&id).cloned() else { return Ok(None) };
        let mut am: node_connection::ActiveModel = existing.into();
        patch.apply(&mut am);
        let mut row = am.try_into_model()?;
        row.updated_at = now();
        t.connections.insert(id, row.clone());
        Ok(Some(row))
    }

    async fn delete_connection(&self, id: i32) -> Result<bool, ServiceError> {
        Ok(self.tables.lock().await.connections.remove(&id).is_some())
    }
}
