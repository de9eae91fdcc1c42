use chrono::NaiveDate;
use models::track::NewTrack;

use crate::validation::{require, FieldError};

/// Stored track record.
pub type Track = models::track::Model;

/// Raw upload as read from a multipart form. Files are fully buffered.
#[derive(Debug, Clone, Default)]
pub struct TrackUpload {
    pub name: String,
    pub artist: String,
    /// ISO `YYYY-MM-DD`; empty or absent means no date.
    pub release_date: Option<String>,
    pub data: Option<Vec<u8>>,
    pub cover: Option<Vec<u8>>,
}

impl TrackUpload {
    /// Check every field and produce the insert values, or all field errors at once.
    pub fn validate(self) -> Result<NewTrack, Vec<FieldError>> {
        let mut errors = Vec::new();
        require(&mut errors, "name", &self.name);
        require(&mut errors, "artist", &self.artist);

        let release_date = match self.release_date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
                Ok(d) => Some(d),
                Err(_) => {
                    errors.push(FieldError::new("release_date", format!("Invalid isoformat string: '{raw}'")));
                    None
                }
            },
        };

        // a present but zero-byte file is still an upload
        let data = match self.data {
            Some(bytes) => bytes,
            None => {
                errors.push(FieldError::new("data", "A media file is required."));
                Vec::new()
            }
        };
        let cover = self.cover.filter(|c| !c.is_empty());

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(NewTrack {
            name: self.name.trim().to_string(),
            artist: self.artist.trim().to_string(),
            data,
            cover,
            release_date,
        })
    }
}
