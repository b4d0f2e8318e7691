//! Collection entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lingopod_core::types::{DbId, Timestamp};

/// A row from the `audio_collections` table.
///
/// The ordered track membership is not embedded; fetch it separately via
/// `CollectionRepo::track_ids`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AudioCollection {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub owner_id: DbId,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub collection_type: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a new collection row.
#[derive(Debug, Clone)]
pub struct CreateCollection {
    pub title: String,
    pub description: String,
    pub owner_id: DbId,
    pub collection_type: String,
}

/// A collection together with its ordered track ids.
#[derive(Debug, Clone, Serialize)]
pub struct CollectionDetails {
    #[serde(flatten)]
    pub collection: AudioCollection,
    pub track_ids: Vec<DbId>,
}

/// DTO for metadata updates. Title is required; a `None` description
/// leaves the stored value unchanged.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCollection {
    pub title: String,
    pub description: Option<String>,
}
