use async_trait::async_trait;
use models::track::NewTrack;

use super::domain::Track;
use crate::errors::ServiceError;

/// Repository abstraction for track persistence. Writes are transactional in
/// the database-backed implementation.
#[async_trait]
pub trait TrackRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Track>, ServiceError>;
    async fn get(&self, id: i32) -> Result<Option<Track>, ServiceError>;
    async fn insert(&self, new: NewTrack) -> Result<Track, ServiceError>;
    /// Remove one track, returning it; `NotFound` when absent.
    async fn delete(&self, id: i32) -> Result<Track, ServiceError>;
    /// Remove every track, returning how many rows went away.
    async fn delete_all(&self) -> Result<u64, ServiceError>;
}

/// Simple in-memory mock repository for tests
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockTrackRepository {
        inner: Mutex<(i32, Vec<Track>)>,
    }

    #[async_trait]
    impl TrackRepository for MockTrackRepository {
        async fn list(&self) -> Result<Vec<Track>, ServiceError> {
            Ok(self.inner.lock().unwrap().1.clone())
        }

        async fn get(&self, id: i32) -> Result<Option<Track>, ServiceError> {
            Ok(self.inner.lock().unwrap().1.iter().find(|t| t.id == id).cloned())
        }

        async fn insert(&self, new: NewTrack) -> Result<Track, ServiceError> {
            let mut guard = self.inner.lock().unwrap();
            guard.0 += 1;
            let track = Track {
                id: guard.0,
                name: new.name,
                artist: new.artist,
                data: new.data,
                cover: new.cover,
                release_date: new.release_date,
            };
            guard.1.push(track.clone());
            Ok(track)
        }

        async fn delete(&self, id: i32) -> Result<Track, ServiceError> {
            let mut guard = self.inner.lock().unwrap();
            let pos = guard.1.iter().position(|t| t.id == id).ok_or_else(|| ServiceError::not_found("track", id))?;
            Ok(guard.1.remove(pos))
        }

        async fn delete_all(&self) -> Result<u64, ServiceError> {
            let mut guard = self.inner.lock().unwrap();
            let n = guard.1.len() as u64;
            guard.1.clear();
            Ok(n)
        }
    }
}
