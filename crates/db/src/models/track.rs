//! Audio track entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lingopod_core::types::{DbId, Timestamp};

/// A row from the `audio_tracks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AudioTrack {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub language_code: String,
    pub level: String,
    pub duration_ms: i64,
    pub minio_bucket: String,
    pub minio_object_key: String,
    pub cover_image_url: Option<String>,
    pub uploader_id: Option<DbId>,
    pub is_public: bool,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new track row.
#[derive(Debug, Clone)]
pub struct CreateAudioTrack {
    pub title: String,
    pub description: String,
    pub language_code: String,
    pub level: String,
    pub duration_ms: i64,
    pub minio_bucket: String,
    pub minio_object_key: String,
    pub cover_image_url: Option<String>,
    pub uploader_id: Option<DbId>,
    pub is_public: bool,
    pub tags: Vec<String>,
}

/// Filters for track listing. All fields optional; `None` means "any".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackFilters {
    pub language_code: Option<String>,
    pub level: Option<String>,
    /// Case-insensitive substring match against the title.
    pub query: Option<String>,
}
