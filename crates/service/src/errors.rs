use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("database error: {0}")]
    Db(String),
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str) -> Self { Self::NotFound(format!("{} not found", entity)) }

    pub fn missing_reference(entity: &str, id: i32) -> Self {
        Self::Validation(format!("{} {} does not exist", entity, id))
    }
}

impl From<DbErr> for ServiceError {
    fn from(e: DbErr) -> Self {
        // A concurrent delete can slip past the existence checks; the FK still catches it.
        match e.sql_err() {
            Some(SqlErr::ForeignKeyConstraintViolation(msg)) => Self::Validation(msg),
            _ => Self::Db(e.to_string()),
        }
    }
}
