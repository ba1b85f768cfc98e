use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use serde::{Deserialize, Serialize};

use crate::node;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "node_connections")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub from_node_id: i32,
    pub to_node_id: i32,
    #[sea_orm(column_type = "Text", nullable)]
    pub label: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    FromNode,
    ToNode,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::FromNode => Entity::belongs_to(node::Entity).from(Column::FromNodeId).to(node::Column::Id).into(),
            Relation::ToNode => Entity::belongs_to(node::Entity).from(Column::ToNodeId).to(node::Column::Id).into(),
        }
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let now: DateTimeWithTimeZone = chrono::Utc::now().into();
        if insert {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}
