//! Handlers for the `/tracks` resource.

use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use lingopod_core::error::CoreError;
use lingopod_core::types::DbId;
use lingopod_core::value::{AudioLevel, LanguageCode};
use lingopod_db::models::track::{AudioTrack, TrackFilters};
use lingopod_db::repositories::{clamp_limit, clamp_offset, TrackRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::{AuthUser, MaybeAuthUser};
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /tracks`.
#[derive(Debug, Deserialize)]
pub struct TrackListParams {
    pub language_code: Option<String>,
    pub level: Option<String>,
    /// Case-insensitive substring match against the title.
    pub query: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// A track plus a short-lived presigned playback URL.
#[derive(Debug, Serialize)]
pub struct TrackWithStreamUrl {
    #[serde(flatten)]
    pub track: AudioTrack,
    pub stream_url: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/tracks
///
/// Public catalog listing with optional language/level/title filters.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<TrackListParams>,
) -> AppResult<Json<ListResponse<AudioTrack>>> {
    // Canonicalize filters so `?language_code=de` matches stored `DE`.
    let language_code = params
        .language_code
        .as_deref()
        .map(LanguageCode::new)
        .transpose()
        .map_err(AppError::Core)?
        .map(|l| l.as_str().to_string());

    let level = params
        .level
        .as_deref()
        .map(AudioLevel::parse)
        .transpose()
        .map_err(AppError::Core)?
        .map(|l| l.as_str().to_string());

    let filters = TrackFilters {
        language_code,
        level,
        query: params.query,
    };

    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);

    let (tracks, total) = TrackRepo::list(&state.pool, &filters, limit, offset).await?;
    Ok(Json(ListResponse {
        data: tracks,
        total,
    }))
}

/// GET /api/v1/tracks/{id}
///
/// Fetch one track with a presigned playback URL. Private tracks are
/// visible only to their uploader; everyone else gets a 404 so the
/// track's existence is not leaked.
pub async fn get(
    State(state): State<AppState>,
    MaybeAuthUser(auth_user): MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TrackWithStreamUrl>>> {
    let track = TrackRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "audio track",
                id,
            })
        })?;

    if !track.is_public {
        let is_uploader = auth_user
            .as_ref()
            .map(|u| Some(u.user_id) == track.uploader_id)
            .unwrap_or(false);
        if !is_uploader {
            return Err(AppError::Core(CoreError::NotFound {
                entity: "audio track",
                id,
            }));
        }
    }

    let expiry = Duration::from_secs(state.config.storage.presign_expiry_secs);
    let stream_url = state
        .storage
        .presign_get(&track.minio_bucket, &track.minio_object_key, expiry)
        .await?;

    Ok(Json(DataResponse {
        data: TrackWithStreamUrl { track, stream_url },
    }))
}

/// DELETE /api/v1/tracks/{id}
///
/// Remove a track. Only its uploader may delete it.
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let track = TrackRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "audio track",
                id,
            })
        })?;

    if track.uploader_id != Some(auth_user.user_id) {
        return Err(AppError::Core(CoreError::PermissionDenied(
            "only the uploader can delete a track".into(),
        )));
    }

    TrackRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
