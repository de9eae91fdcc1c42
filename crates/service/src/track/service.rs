use std::sync::Arc;

use tracing::{info, instrument};

use super::domain::{Track, TrackUpload};
use super::repository::TrackRepository;
use crate::errors::ServiceError;

/// Track business service independent of web framework
pub struct TrackService<R: TrackRepository> {
    repo: Arc<R>,
}

impl<R: TrackRepository> TrackService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn list(&self) -> Result<Vec<Track>, ServiceError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i32) -> Result<Track, ServiceError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("track", id))
    }

    /// Validate an upload and persist it.
    ///
    /// # Examples
    /// ```
    /// use service::track::{TrackService, domain::TrackUpload, repository::mock::MockTrackRepository};
    /// use std::sync::Arc;
    /// let svc = TrackService::new(Arc::new(MockTrackRepository::default()));
    /// let upload = TrackUpload { name: "Song".into(), artist: "Band".into(), data: Some(vec![1]), ..Default::default() };
    /// let track = tokio_test::block_on(svc.upload(upload)).unwrap();
    /// assert_eq!(track.id, 1);
    /// ```
    #[instrument(skip(self, upload), fields(name = %upload.name, artist = %upload.artist))]
    pub async fn upload(&self, upload: TrackUpload) -> Result<Track, ServiceError> {
        let new = upload.validate().map_err(ServiceError::Validation)?;
        let track = self.repo.insert(new).await?;
        info!(track_id = track.id, bytes = track.data.len(), "track_uploaded");
        Ok(track)
    }

    pub async fn delete(&self, id: i32) -> Result<Track, ServiceError> {
        let track = self.repo.delete(id).await?;
        info!(track_id = id, "track_deleted");
        Ok(track)
    }

    /// Remove all tracks. Destructive and unconfirmed; the table stays usable.
    pub async fn clear(&self) -> Result<u64, ServiceError> {
        let n = self.repo.delete_all().await?;
        info!(deleted = n, "tracks_cleared");
        Ok(n)
    }
}
