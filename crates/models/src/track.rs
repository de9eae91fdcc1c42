use sea_orm::{entity::prelude::*, ConnectionTrait, QueryOrder, Set};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tracks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    /// Free text for now; meant to point at a `user` row eventually.
    pub artist: String,
    pub data: Vec<u8>,
    pub cover: Option<Vec<u8>>,
    pub release_date: Option<Date>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Column values for an insert; `id` is assigned by the store.
#[derive(Clone, Debug, Default)]
pub struct NewTrack {
    pub name: String,
    pub artist: String,
    pub data: Vec<u8>,
    pub cover: Option<Vec<u8>>,
    pub release_date: Option<Date>,
}

pub async fn create<C: ConnectionTrait>(db: &C, new: NewTrack) -> Result<Model, ModelError> {
    if new.name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    let am = ActiveModel {
        name: Set(new.name),
        artist: Set(new.artist),
        data: Set(new.data),
        cover: Set(new.cover),
        release_date: Set(new.release_date),
        ..Default::default()
    };
    Ok(am.insert(db).await?)
}

pub async fn list<C: ConnectionTrait>(db: &C) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().order_by_asc(Column::Id).all(db).await?)
}

pub async fn find_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

/// Delete one row and hand back what was removed.
pub async fn delete_by_id<C: ConnectionTrait>(db: &C, id: i32) -> Result<Model, ModelError> {
    let found = Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ModelError::NotFound(format!("track {id}")))?;
    Entity::delete_by_id(id).exec(db).await?;
    Ok(found)
}

/// Remove every row; the table itself stays in place.
pub async fn delete_all<C: ConnectionTrait>(db: &C) -> Result<u64, ModelError> {
    let res = Entity::delete_many().exec(db).await?;
    Ok(res.rows_affected)
}

pub async fn count<C: ConnectionTrait>(db: &C) -> Result<u64, ModelError> {
    use sea_orm::PaginatorTrait;
    Ok(Entity::find().count(db).await?)
}
