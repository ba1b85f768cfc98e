use sea_orm::{entity::prelude::*, Set, ConnectionTrait, QueryFilter};
use serde::{Deserialize, Serialize};

use crate::errors;
use crate::mind_map;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    /// argon2 PHC string; never leaves the process.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    MindMaps,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self { Relation::MindMaps => Entity::has_many(mind_map::Entity).into() }
    }
}

impl Related<mind_map::Entity> for Entity {
    fn to() -> RelationDef { Relation::MindMaps.def() }
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

pub fn validate_username(username: &str) -> Result<(), errors::ModelError> {
    if username.trim().is_empty() { return Err(errors::ModelError::Validation("username required".into())); }
    if username.len() > 128 { return Err(errors::ModelError::Validation("username too long (<=128)".into())); }
    Ok(())
}

/// Insert a user; `password_hash` must already be hashed.
pub async fn create<C: ConnectionTrait>(db: &C, username: &str, password_hash: String) -> Result<Model, errors::ModelError> {
    validate_username(username)?;
    if password_hash.trim().is_empty() { return Err(errors::ModelError::Validation("password hash required".into())); }
    let am = ActiveModel {
        username: Set(username.trim().to_string()),
        password_hash: Set(password_hash),
        ..Default::default()
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn find_by_username<C: ConnectionTrait>(db: &C, username: &str) -> Result<Option<Model>, errors::ModelError> {
    Entity::find()
        .filter(Column::Username.eq(username.trim()))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
