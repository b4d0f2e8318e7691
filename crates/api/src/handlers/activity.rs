//! Handlers for playback progress and bookmarks.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use lingopod_core::error::CoreError;
use lingopod_core::types::DbId;
use lingopod_db::models::activity::{Bookmark, CreateBookmark, PlaybackProgress};
use lingopod_db::repositories::{clamp_limit, clamp_offset, BookmarkRepo, ProgressRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `PUT /progress/{track_id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateProgressRequest {
    pub progress_ms: i64,
}

/// Query parameters for `GET /bookmarks`.
#[derive(Debug, Deserialize)]
pub struct BookmarkListParams {
    pub track_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

// ---------------------------------------------------------------------------
// Progress handlers
// ---------------------------------------------------------------------------

/// PUT /api/v1/progress/{track_id}
///
/// Record the listener's position in a track. Last write wins.
pub async fn update_progress(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(track_id): Path<DbId>,
    Json(input): Json<UpdateProgressRequest>,
) -> AppResult<Json<DataResponse<PlaybackProgress>>> {
    if input.progress_ms < 0 {
        return Err(AppError::Core(CoreError::InvalidArgument(
            "progress_ms must not be negative".into(),
        )));
    }

    let progress =
        ProgressRepo::upsert(&state.pool, auth_user.user_id, track_id, input.progress_ms).await?;
    Ok(Json(DataResponse { data: progress }))
}

/// GET /api/v1/progress/{track_id}
pub async fn get_progress(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(track_id): Path<DbId>,
) -> AppResult<Json<DataResponse<PlaybackProgress>>> {
    let progress = ProgressRepo::find(&state.pool, auth_user.user_id, track_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "playback progress",
                id: track_id,
            })
        })?;
    Ok(Json(DataResponse { data: progress }))
}

/// GET /api/v1/progress
///
/// The user's listening history, most recent first.
pub async fn list_progress(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ListResponse<PlaybackProgress>>> {
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);

    let (rows, total) =
        ProgressRepo::list_by_user(&state.pool, auth_user.user_id, limit, offset).await?;
    Ok(Json(ListResponse { data: rows, total }))
}

// ---------------------------------------------------------------------------
// Bookmark handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/bookmarks
pub async fn create_bookmark(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CreateBookmark>,
) -> AppResult<(StatusCode, Json<DataResponse<Bookmark>>)> {
    if input.timestamp_ms < 0 {
        return Err(AppError::Core(CoreError::InvalidArgument(
            "timestamp_ms must not be negative".into(),
        )));
    }

    let bookmark = BookmarkRepo::create(&state.pool, auth_user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: bookmark })))
}

/// GET /api/v1/bookmarks
///
/// The user's bookmarks, optionally filtered to one track, ordered by
/// position in the audio.
pub async fn list_bookmarks(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<BookmarkListParams>,
) -> AppResult<Json<ListResponse<Bookmark>>> {
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);

    let (bookmarks, total) = BookmarkRepo::list_by_user(
        &state.pool,
        auth_user.user_id,
        params.track_id,
        limit,
        offset,
    )
    .await?;
    Ok(Json(ListResponse {
        data: bookmarks,
        total,
    }))
}

/// DELETE /api/v1/bookmarks/{id}
///
/// Delete one of the user's own bookmarks.
pub async fn delete_bookmark(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let deleted = BookmarkRepo::delete(&state.pool, id, auth_user.user_id).await?;
    if !deleted {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "bookmark",
            id,
        }));
    }
    Ok(StatusCode::NO_CONTENT)
}
