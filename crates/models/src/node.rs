use sea_orm::{entity::prelude::*, Set, ConnectionTrait};
use serde::{Deserialize, Serialize};

use crate::{mind_map, node_connection};

/// A unit of text inside a mind map.
///
/// `parent_id` is a weak pointer to another node used for layout only; the
/// schema carries no foreign key for it. `position` is stored verbatim.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "nodes")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub map_id: i32,
    #[sea_orm(column_type = "Text")]
    pub text: String,
    pub parent_id: Option<i32>,
    #[sea_orm(column_type = "Text")]
    pub position: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    MindMap,
    FromConnections,
    ToConnections,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::MindMap => Entity::belongs_to(mind_map::Entity).from(Column::MapId).to(mind_map::Column::Id).into(),
            // Two edges point at this table, so each direction is spelled out.
            Relation::FromConnections => node_connection::Relation::FromNode.def().rev(),
            Relation::ToConnections => node_connection::Relation::ToNode.def().rev(),
        }
    }
}

impl Related<mind_map::Entity> for Entity {
    fn to() -> RelationDef { Relation::MindMap.def() }
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
