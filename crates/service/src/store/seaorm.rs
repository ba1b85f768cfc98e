use async_trait::async_trait;
use sea_orm::{
    entity::prelude::DateTimeWithTimeZone, sea_query::{Expr, Query}, ActiveModelTrait, ColumnTrait, Condition,
    DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::debug;

use models::{mind_map, node, node_connection, user};

use super::ResourceStore;
use crate::domain::{ConnectionPatch, MindMapPatch, MindMapTree, NewConnection, NewMindMap, NewNode, NodePatch};
use crate::errors::ServiceError;

/// PostgreSQL-backed store. Cloning shares the underlying pool.
#[derive(Clone)]
pub struct SeaOrmResourceStore {
    pub db: DatabaseConnection,
}

impl SeaOrmResourceStore {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

/// Connections with either endpoint on the given node.
fn touching_node(node_id: i32) -> Condition {
    Condition::any()
        .add(node_connection::Column::FromNodeId.eq(node_id))
        .add(node_connection::Column::ToNodeId.eq(node_id))
}

/// Connections with either endpoint on a node of `map_id`. The node set is a
/// subquery so the statement binds one parameter regardless of map size.
fn touching_map(map_id: i32) -> Condition {
    let nodes_of_map = || {
        Query::select()
            .column(node::Column::Id)
            .from(node::Entity)
            .and_where(node::Column::MapId.eq(map_id))
            .to_owned()
    };
    Condition::any()
        .add(node_connection::Column::FromNodeId.in_subquery(nodes_of_map()))
        .add(node_connection::Column::ToNodeId.in_subquery(nodes_of_map()))
}

#[async_trait]
impl ResourceStore for SeaOrmResourceStore {
    async fn create_user(&self, username: &str, password_hash: String) -> Result<user::Model, ServiceError> {
        Ok(user::create(&self.db, username, password_hash).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<user::Model>, ServiceError> {
        Ok(user::find_by_username(&self.db, username).await?)
    }

    async fn user_exists(&self, id: i32) -> Result<bool, ServiceError> {
        Ok(user::Entity::find_by_id(id).one(&self.db).await?.is_some())
    }

    async fn list_mind_maps(&self) -> Result<Vec<mind_map::Model>, ServiceError> {
        let rows = mind_map::Entity::find().order_by_asc(mind_map::Column::Id).all(&self.db).await?;
        Ok(rows)
    }

    async fn find_mind_map(&self, id: i32) -> Result<Option<mind_map::Model>, ServiceError> {
        Ok(mind_map::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn load_mind_map_tree(&self, id: i32) -> Result<Option<MindMapTree>, ServiceError> {
        let Some(map) = mind_map::Entity::find_by_id(id).one(&self.db).await? else { return Ok(None) };
        let nodes = node::Entity::find()
            .filter(node::Column::MapId.eq(id))
            .order_by_asc(node::Column::Id)
            .all(&self.db)
            .await?;
        let connections = if nodes.is_empty() {
            Vec::new()
        } else {
            node_connection::Entity::find()
                .filter(touching_map(id))
                .order_by_asc(node_connection::Column::Id)
                .all(&self.db)
                .await?
        };
        debug!(map_id = id, nodes = nodes.len(), connections = connections.len(), "loaded mind map tree");
        Ok(Some(MindMapTree::assemble(map, nodes, connections)))
    }

    async fn insert_mind_map(&self, input: NewMindMap) -> Result<mind_map::Model, ServiceError> {
        let am = mind_map::ActiveModel {
            title: Set(input.title),
            user_id: Set(input.user_id),
            ..Default::default()
        };
        Ok(am.insert(&self.db).await?)
    }

    async fn update_mind_map(&self, id: i32, patch: MindMapPatch) -> Result<Option<mind_map::Model>, ServiceError> {
        let Some(existing) = mind_map::Entity::find_by_id(id).one(&self.db).await? else { return Ok(None) };
        let mut am: mind_map::ActiveModel = existing.into();
        patch.apply(&mut am);
        Ok(Some(am.update(&self.db).await?))
    }

    async fn delete_mind_map(&self, id: i32) -> Result<bool, ServiceError> {
        let txn = self.db.begin().await?;
        if mind_map::Entity::find_by_id(id).one(&txn).await?.is_none() {
            txn.rollback().await?;
            return Ok(false);
        }
        let edges = node_connection::Entity::delete_many().filter(touching_map(id)).exec(&txn).await?;
        let nodes = node::Entity::delete_many().filter(node::Column::MapId.eq(id)).exec(&txn).await?;
        mind_map::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        debug!(map_id = id, nodes = nodes.rows_affected, connections = edges.rows_affected, "mind map removed with its nodes");
        Ok(true)
    }

    async fn list_nodes(&self) -> Result<Vec<node::Model>, ServiceError> {
        Ok(node::Entity::find().order_by_asc(node::Column::Id).all(&self.db).await?)
    }

    async fn find_node(&self, id: i32) -> Result<Option<node::Model>, ServiceError> {
        Ok(node::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn insert_node(&self, input: NewNode) -> Result<node::Model, ServiceError> {
        let am = node::ActiveModel {
            map_id: Set(input.map_id),
            text: Set(input.text),
            parent_id: Set(input.parent_id),
            position: Set(input.position),
            ..Default::default()
        };
        Ok(am.insert(&self.db).await?)
    }

    async fn update_node(&self, id: i32, patch: NodePatch) -> Result<Option<node::Model>, ServiceError> {
        let Some(existing) = node::Entity::find_by_id(id).one(&self.db).await? else { return Ok(None) };
        let mut am: node::ActiveModel = existing.into();
        patch.apply(&mut am);
        Ok(Some(am.update(&self.db).await?))
    }

    async fn delete_node(&self, id: i32) -> Result<bool, ServiceError> {
        let txn = self.db.begin().await?;
        if node::Entity::find_by_id(id).one(&txn).await?.is_none() {
            txn.rollback().await?;
            return Ok(false);
        }
        let edges = node_connection::Entity::delete_many().filter(touching_node(id)).exec(&txn).await?;
        // update_many skips before_save, so updated_at is written by hand.
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        let children = node::Entity::update_many()
            .col_expr(node::Column::ParentId, Expr::value(Option::<i32>::None))
            .col_expr(node::Column::UpdatedAt, Expr::value(now))
            .filter(node::Column::ParentId.eq(id))
            .exec(&txn)
            .await?;
        node::Entity::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;
        debug!(node_id = id, connections = edges.rows_affected, children = children.rows_affected, "node removed");
        Ok(true)
    }

    async fn list_connections(&self) -> Result<Vec<node_connection::Model>, ServiceError> {
        Ok(node_connection::Entity::find().order_by_asc(node_connection::Column::Id).all(&self.db).await?)
    }

    async fn find_connection(&self, id: i32) -> Result<Option<node_connection::Model>, ServiceError> {
        Ok(node_connection::Entity::find_by_id(id).one(&self.db).await?)
    }

    async fn insert_connection(&self, input: NewConnection) -> Result<node_connection::Model, ServiceError> {
        let am = node_connection::ActiveModel {
            from_node_id: Set(input.from_node_id),
            to_node_id: Set(input.to_node_id),
            label: Set(input.label),
            ..Default::default()
        };
        Ok(am.insert(&self.db).await?)
    }

    async fn update_connection(&self, id: i32, patch: ConnectionPatch) -> Result<Option<node_connection::Model>, ServiceError> {
        let Some(existing) = node_connection::Entity::find_by_id(id).one(&self.db).await? else { return Ok(None) };
        let mut am: node_connection::ActiveModel = existing.into();
        patch.apply(&mut am);
        Ok(Some(am.update(&self.db).await?))
    }

    async fn delete_connection(&self, id: i32) -> Result<bool, ServiceError> {
        let res = node_connection::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(res.rows_affected > 0)
    }
}
