use sea_orm::{entity::prelude::*, ConnectionTrait, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const USERNAME_MIN: usize = 2;
pub const USERNAME_MAX: usize = 20;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    /// PHC-format password hash.
    pub password: String,
    pub picture: Option<Vec<u8>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Reject anything that is not `local@domain.tld` shaped.
pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let email = email.trim();
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ModelError::Validation("invalid email".into()));
    };
    let domain_ok = !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain.contains('.')
        && !domain.contains('@');
    if local.is_empty() || !domain_ok || email.chars().any(char::is_whitespace) {
        return Err(ModelError::Validation("invalid email".into()));
    }
    Ok(())
}

pub fn validate_username(username: &str) -> Result<(), ModelError> {
    let len = username.trim().chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(ModelError::Validation(format!(
            "username must be between {USERNAME_MIN} and {USERNAME_MAX} characters"
        )));
    }
    Ok(())
}

pub async fn create<C: ConnectionTrait>(
    db: &C,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<Model, ModelError> {
    validate_username(username)?;
    validate_email(email)?;
    if password_hash.trim().is_empty() {
        return Err(ModelError::Validation("password hash required".into()));
    }
    let am = ActiveModel {
        username: Set(username.trim().to_string()),
        email: Set(email.trim().to_string()),
        password: Set(password_hash.to_string()),
        picture: Set(None),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn find_by_email<C: ConnectionTrait>(db: &C, email: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Email.eq(email.trim())).one(db).await?)
}

pub async fn find_by_username<C: ConnectionTrait>(db: &C, username: &str) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find().filter(Column::Username.eq(username.trim())).one(db).await?)
}

/// Replace (or clear) a user's profile picture.
pub async fn set_picture<C: ConnectionTrait>(db: &C, id: i32, picture: Option<Vec<u8>>) -> Result<Model, ModelError> {
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::NotFound(format!("user {id}")))?
        .into();
    am.picture = Set(picture);
    Ok(am.update(db).await?)
}
