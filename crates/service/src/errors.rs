use models::errors::ModelError;
use thiserror::Error;

use crate::validation::{self, FieldError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {}", validation::summarize(.0))]
    Validation(Vec<FieldError>),
    #[error("invalid credentials")]
    Unauthorized,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("hashing error: {0}")]
    Hash(String),
    #[error("token error: {0}")]
    Token(String),
    #[error("database error: {0}")]
    Db(String),
}

impl ServiceError {
    pub fn not_found(entity: &str, id: i32) -> Self { Self::NotFound(format!("{entity} {id} not found")) }
}

impl From<ModelError> for ServiceError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::Validation(msg) => ServiceError::Validation(vec![FieldError::form(msg)]),
            ModelError::Conflict(msg) => ServiceError::Conflict(msg),
            ModelError::NotFound(msg) => ServiceError::NotFound(msg),
            ModelError::Db(msg) => ServiceError::Db(msg),
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(err: sea_orm::DbErr) -> Self {
        ModelError::from(err).into()
    }
}
