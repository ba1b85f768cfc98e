use std::sync::Arc;

use tracing::{info, instrument, warn};

use models::{mind_map, node, node_connection, user};

use crate::domain::{ConnectionPatch, MindMapPatch, MindMapTree, NewConnection, NewMindMap, NewNode, NodePatch};
use crate::errors::ServiceError;
use crate::password;
use crate::store::ResourceStore;

pub const MIND_MAP: &str = "mind map";
pub const NODE: &str = "node";
pub const CONNECTION: &str = "connection";
pub const USER: &str = "user";

/// Application service over a [`ResourceStore`].
///
/// Adds what the store does not: not-found mapping, existence checks on
/// referenced rows before writes, and password hashing. `parent_id` on a node
/// is a weak reference and is not checked.
#[derive(Clone)]
pub struct ResourceService {
    store: Arc<dyn ResourceStore>,
}

impl ResourceService {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self { Self { store } }

    // users

    #[instrument(skip(self, password))]
    pub async fn register_user(&self, username: &str, password: &str) -> Result<user::Model, ServiceError> {
        if password.is_empty() {
            return Err(ServiceError::Validation("password required".into()));
        }
        let hash = password::hash_password(password)?;
        let created = self.store.create_user(username, hash).await?;
        info!(user_id = created.id, username = %created.username, "user_registered");
        Ok(created)
    }

    /// Return the named user, registering it first when absent.
    #[instrument(skip(self, password))]
    pub async fn ensure_user(&self, username: &str, password: &str) -> Result<user::Model, ServiceError> {
        match self.store.find_user_by_username(username).await? {
            Some(existing) => {
                if !password::verify_password(password, &existing.password_hash)? {
                    warn!(user_id = existing.id, "stored password differs from configured seed password; keeping stored one");
                }
                Ok(existing)
            }
            None => self.register_user(username, password).await,
        }
    }

    // mind maps

    pub async fn list_mind_maps(&self) -> Result<Vec<mind_map::Model>, ServiceError> {
        self.store.list_mind_maps().await
    }

    #[instrument(skip(self))]
    pub async fn get_mind_map(&self, id: i32) -> Result<MindMapTree, ServiceError> {
        self.store.load_mind_map_tree(id).await?.ok_or_else(|| ServiceError::not_found(MIND_MAP))
    }

    #[instrument(skip(self, input), fields(user_id = input.user_id))]
    pub async fn create_mind_map(&self, input: NewMindMap) -> Result<mind_map::Model, ServiceError> {
        self.require_user(input.user_id).await?;
        let created = self.store.insert_mind_map(input).await?;
        info!(map_id = created.id, "mind_map_created");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_mind_map(&self, id: i32, patch: MindMapPatch) -> Result<mind_map::Model, ServiceError> {
        if self.store.find_mind_map(id).await?.is_none() {
            return Err(ServiceError::not_found(MIND_MAP));
        }
        if let Some(user_id) = patch.user_id {
            self.require_user(user_id).await?;
        }
        self.store.update_mind_map(id, patch).await?.ok_or_else(|| ServiceError::not_found(MIND_MAP))
    }

    #[instrument(skip(self))]
    pub async fn delete_mind_map(&self, id: i32) -> Result<(), ServiceError> {
        if !self.store.delete_mind_map(id).await? {
            return Err(ServiceError::not_found(MIND_MAP));
        }
        info!(map_id = id, "mind_map_deleted");
        Ok(())
    }

    // nodes

    pub async fn list_nodes(&self) -> Result<Vec<node::Model>, ServiceError> {
        self.store.list_nodes().await
    }

    pub async fn get_node(&self, id: i32) -> Result<node::Model, ServiceError> {
        self.store.find_node(id).await?.ok_or_else(|| ServiceError::not_found(NODE))
    }

    #[instrument(skip(self, input), fields(map_id = input.map_id))]
    pub async fn create_node(&self, input: NewNode) -> Result<node::Model, ServiceError> {
        self.require_mind_map(input.map_id).await?;
        let created = self.store.insert_node(input).await?;
        info!(node_id = created.id, "node_created");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_node(&self, id: i32, patch: NodePatch) -> Result<node::Model, ServiceError> {
        if self.store.find_node(id).await?.is_none() {
            return Err(ServiceError::not_found(NODE));
        }
        if let Some(map_id) = patch.map_id {
            self.require_mind_map(map_id).await?;
        }
        self.store.update_node(id, patch).await?.ok_or_else(|| ServiceError::not_found(NODE))
    }

    #[instrument(skip(self))]
    pub async fn delete_node(&self, id: i32) -> Result<(), ServiceError> {
        if !self.store.delete_node(id).await? {
            return Err(ServiceError::not_found(NODE));
        }
        info!(node_id = id, "node_deleted");
        Ok(())
    }

    // connections

    pub async fn list_connections(&self) -> Result<Vec<node_connection::Model>, ServiceError> {
        self.store.list_connections().await
    }

    pub async fn get_connection(&self, id: i32) -> Result<node_connection::Model, ServiceError> {
        self.store.find_connection(id).await?.ok_or_else(|| ServiceError::not_found(CONNECTION))
    }

    #[instrument(skip(self, input), fields(from = input.from_node_id, to = input.to_node_id))]
    pub async fn create_connection(&self, input: NewConnection) -> Result<node_connection::Model, ServiceError> {
        self.require_node(input.from_node_id).await?;
        self.require_node(input.to_node_id).await?;
        let created = self.store.insert_connection(input).await?;
        info!(connection_id = created.id, "connection_created");
        Ok(created)
    }

    #[instrument(skip(self, patch))]
    pub async fn update_connection(&self, id: i32, patch: ConnectionPatch) -> Result<node_connection::Model, ServiceError> {
        if self.store.find_connection(id).await?.is_none() {
            return Err(ServiceError::not_found(CONNECTION));
        }
        if let Some(from) = patch.from_node_id {
            self.require_node(from).await?;
        }
        if let Some(to) = patch.to_node_id {
            self.require_node(to).await?;
        }
        self.store.update_connection(id, patch).await?.ok_or_else(|| ServiceError::not_found(CONNECTION))
    }

    #[instrument(skip(self))]
    pub async fn delete_connection(&self, id: i32) -> Result<(), ServiceError> {
        if !self.store.delete_connection(id).await? {
            return Err(ServiceError::not_found(CONNECTION));
        }
        info!(connection_id = id, "connection_deleted");
        Ok(())
    }

    async fn require_user(&self, id: i32) -> Result<(), ServiceError> {
        if self.store.user_exists(id).await? { Ok(()) } else { Err(ServiceError::missing_reference(USER, id)) }
    }

    async fn require_mind_map(&self, id: i32) -> Result<(), ServiceError> {
        match self.store.find_mind_map(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::missing_reference(MIND_MAP, id)),
        }
    }

    async fn require_node(&self, id: i32) -> Result<(), ServiceError> {
        match self.store.find_node(id).await? {
            Some(_) => Ok(()),
            None => Err(ServiceError::missing_reference(NODE, id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::InMemoryResourceStore;

    async fn service_with_user() -> (ResourceService, user::Model) {
        let svc = ResourceService::new(Arc::new(InMemoryResourceStore::new()));
        let u = svc.register_user("owner", "Passw0rd").await.unwrap();
        (svc, u)
    }

    fn node_in(map_id: i32, text: &str) -> NewNode {
        NewNode { map_id, text: text.into(), parent_id: None, position: "1,2".into() }
    }

    #[tokio::test]
    async fn registered_user_has_hashed_password() {
        let (_svc, u) = service_with_user().await;
        assert_ne!(u.password_hash, "Passw0rd");
        assert!(password::verify_password("Passw0rd", &u.password_hash).unwrap());
    }

    #[tokio::test]
    async fn ensure_user_is_idempotent() {
        let (svc, u) = service_with_user().await;
        let again = svc.ensure_user("owner", "Passw0rd").await.unwrap();
        assert_eq!(again.id, u.id);
        let other = svc.ensure_user("second", "secret").await.unwrap();
        assert_ne!(other.id, u.id);
    }

    #[tokio::test]
    async fn mind_map_requires_existing_user() {
        let (svc, _u) = service_with_user().await;
        let err = svc.create_mind_map(NewMindMap { title: "t".into(), user_id: 9999 }).await.unwrap_err();
        assert!(matches!(err, ServiceError::Validation(m) if m == "user 9999 does not exist"));
    }

    #[tokio::test]
    async fn connection_requires_existing_nodes() {
        let (svc, u) = service_with_user().await;
        let m = svc.create_mind_map(NewMindMap { title: "t".into(), user_id: u.id }).await.unwrap();
        let a = svc.create_node(node_in(m.id, "a")).await.unwrap();
        let err = svc
            .create_connection(NewConnection { from_node_id: a.id, to_node_id: 4242, label: None })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        assert!(svc.list_connections().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn node_requires_existing_map_but_not_parent() {
        let (svc, u) = service_with_user().await;
        assert!(matches!(svc.create_node(node_in(77, "x")).await, Err(ServiceError::Validation(_))));
        let m = svc.create_mind_map(NewMindMap { title: "t".into(), user_id: u.id }).await.unwrap();
        let n = svc.create_node(NewNode { parent_id: Some(5555), ..node_in(m.id, "weak") }).await.unwrap();
        assert_eq!(n.parent_id, Some(5555));
    }

    #[tokio::test]
    async fn get_mind_map_partitions_connections() {
        let (svc, u) = service_with_user().await;
        let m = svc.create_mind_map(NewMindMap { title: "t".into(), user_id: u.id }).await.unwrap();
        let a = svc.create_node(node_in(m.id, "a")).await.unwrap();
        let b = svc.create_node(node_in(m.id, "b")).await.unwrap();
        let c = svc.create_node(node_in(m.id, "c")).await.unwrap();
        let ab = svc.create_connection(NewConnection { from_node_id: a.id, to_node_id: b.id, label: None }).await.unwrap();
        let cb = svc.create_connection(NewConnection { from_node_id: c.id, to_node_id: b.id, label: Some("x".into()) }).await.unwrap();

        let tree = svc.get_mind_map(m.id).await.unwrap();
        assert_eq!(tree.nodes.len(), 3);
        let by_id = |id: i32| tree.nodes.iter().find(|n| n.node.id == id).unwrap();
        assert_eq!(by_id(a.id).from_connections, vec![ab.clone()]);
        assert!(by_id(a.id).to_connections.is_empty());
        assert_eq!(by_id(b.id).to_connections, vec![ab, cb.clone()]);
        assert_eq!(by_id(c.id).from_connections, vec![cb]);
    }

    #[tokio::test]
    async fn delete_mind_map_removes_nodes() {
        let (svc, u) = service_with_user().await;
        let m = svc.create_mind_map(NewMindMap { title: "t".into(), user_id: u.id }).await.unwrap();
        let mut ids = vec![];
        for t in ["1", "2", "3"] {
            ids.push(svc.create_node(node_in(m.id, t)).await.unwrap().id);
        }
        svc.delete_mind_map(m.id).await.unwrap();
        assert!(matches!(svc.get_mind_map(m.id).await, Err(ServiceError::NotFound(_))));
        for id in ids {
            assert!(matches!(svc.get_node(id).await, Err(ServiceError::NotFound(_))));
        }
        assert!(matches!(svc.delete_mind_map(m.id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_title_keeps_other_fields() {
        let (svc, u) = service_with_user().await;
        let m = svc.create_mind_map(NewMindMap { title: "t".into(), user_id: u.id }).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let updated = svc
            .update_mind_map(m.id, MindMapPatch { title: Some("X".into()), user_id: None })
            .await
            .unwrap();
        assert_eq!(updated.title, "X");
        assert_eq!(updated.user_id, m.user_id);
        assert_eq!(updated.created_at, m.created_at);
        assert!(updated.updated_at > m.updated_at);
        assert!(matches!(svc.update_mind_map(404, MindMapPatch::default()).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn update_of_missing_row_is_not_found_even_with_bad_reference() {
        let (svc, _u) = service_with_user().await;
        let patch = NodePatch { map_id: Some(12345), ..Default::default() };
        assert!(matches!(svc.update_node(9999, patch).await, Err(ServiceError::NotFound(_))));
        let patch = MindMapPatch { title: None, user_id: Some(4242) };
        assert!(matches!(svc.update_mind_map(9999, patch).await, Err(ServiceError::NotFound(_))));
        let patch = ConnectionPatch { from_node_id: Some(7), ..Default::default() };
        assert!(matches!(svc.update_connection(9999, patch).await, Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn service_is_constructible_in_sync_context() {
        let svc = ResourceService::new(Arc::new(InMemoryResourceStore::new()));
        let maps = tokio_test::block_on(svc.list_mind_maps()).unwrap();
        assert!(maps.is_empty());
    }
}
