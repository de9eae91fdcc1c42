use models::{errors::ModelError, track::{self, NewTrack}};
use sea_orm::{DatabaseConnection, TransactionTrait};
use tracing::warn;

use crate::errors::ServiceError;
use crate::track::domain::Track;
use crate::track::repository::TrackRepository;

#[derive(Clone)]
pub struct SeaOrmTrackRepository {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl TrackRepository for SeaOrmTrackRepository {
    async fn list(&self) -> Result<Vec<Track>, ServiceError> {
        Ok(track::list(&self.db).await?)
    }

    async fn get(&self, id: i32) -> Result<Option<Track>, ServiceError> {
        Ok(track::find_by_id(&self.db, id).await?)
    }

    async fn insert(&self, new: NewTrack) -> Result<Track, ServiceError> {
        let txn = self.db.begin().await?;
        match track::create(&txn, new).await {
            Ok(created) => {
                txn.commit().await?;
                Ok(created)
            }
            Err(e) => {
                warn!(err = %e, "track insert failed; rolling back");
                txn.rollback().await?;
                Err(e.into())
            }
        }
    }

    async fn delete(&self, id: i32) -> Result<Track, ServiceError> {
        let txn = self.db.begin().await?;
        match track::delete_by_id(&txn, id).await {
            Ok(deleted) => {
                txn.commit().await?;
                Ok(deleted)
            }
            Err(ModelError::NotFound(_)) => {
                txn.rollback().await?;
                Err(ServiceError::not_found("track", id))
            }
            Err(e) => {
                warn!(track_id = id, err = %e, "track delete failed; rolling back");
                txn.rollback().await?;
                Err(e.into())
            }
        }
    }

    async fn delete_all(&self) -> Result<u64, ServiceError> {
        Ok(track::delete_all(&self.db).await?)
    }
}
