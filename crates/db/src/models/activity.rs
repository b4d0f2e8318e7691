//! Listening activity models: playback progress and bookmarks.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lingopod_core::types::{DbId, Timestamp};

/// A row from `playback_progress` (one per user/track pair).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PlaybackProgress {
    pub user_id: DbId,
    pub track_id: DbId,
    pub progress_ms: i64,
    pub last_listened_at: Timestamp,
}

/// A row from the `bookmarks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Bookmark {
    pub id: DbId,
    pub user_id: DbId,
    pub track_id: DbId,
    pub timestamp_ms: i64,
    pub note: String,
    pub created_at: Timestamp,
}

/// DTO for creating a bookmark.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookmark {
    pub track_id: DbId,
    pub timestamp_ms: i64,
    #[serde(default)]
    pub note: String,
}
