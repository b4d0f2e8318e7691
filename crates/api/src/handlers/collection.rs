//! Handlers for the `/collections` resource.
//!
//! The track membership endpoint (`PUT /collections/{id}/tracks`) is the
//! only write path for ordered associations. Ownership check, input
//! validation, existence check, and the full replace all run inside one
//! transaction so concurrent calls serialize cleanly and a failure at
//! any step leaves the stored list untouched.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use lingopod_core::collection::{ensure_tracks_exist, ensure_unique_track_ids};
use lingopod_core::error::CoreError;
use lingopod_core::types::DbId;
use lingopod_core::value::CollectionType;
use lingopod_db::models::collection::{
    AudioCollection, CollectionDetails, CreateCollection, UpdateCollection,
};
use lingopod_db::repositories::{clamp_limit, clamp_offset, CollectionRepo, TrackRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::{DataResponse, ListResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /collections`.
#[derive(Debug, Deserialize)]
pub struct CreateCollectionRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub collection_type: String,
    /// Optional initial ordered membership, applied atomically with the
    /// collection creation.
    #[serde(default)]
    pub track_ids: Vec<DbId>,
}

/// Request body for `PUT /collections/{id}/tracks`.
#[derive(Debug, Deserialize)]
pub struct ReplaceTracksRequest {
    pub track_ids: Vec<DbId>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/collections
pub async fn create(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<CreateCollectionRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CollectionDetails>>)> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::InvalidArgument(
            "title is required".into(),
        )));
    }
    let collection_type = CollectionType::parse(&input.collection_type).map_err(AppError::Core)?;
    ensure_unique_track_ids(&input.track_ids).map_err(AppError::Core)?;

    let create = CreateCollection {
        title: input.title.trim().to_string(),
        description: input.description,
        owner_id: auth_user.user_id,
        collection_type: collection_type.as_str().to_string(),
    };
    let track_ids = input.track_ids;

    let collection = state
        .tx
        .execute(move |conn| {
            Box::pin(async move {
                let collection = CollectionRepo::create(&mut *conn, &create).await?;
                if !track_ids.is_empty() {
                    let existing = TrackRepo::list_existing_ids(&mut *conn, &track_ids).await?;
                    ensure_tracks_exist(&track_ids, &existing)?;
                    CollectionRepo::replace_tracks(conn, collection.id, &track_ids).await?;
                }
                Ok(collection)
            })
        })
        .await?;

    let track_ids = CollectionRepo::track_ids(&state.pool, collection.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CollectionDetails {
                collection,
                track_ids,
            },
        }),
    ))
}

/// GET /api/v1/collections
///
/// List the authenticated user's collections, newest first.
pub async fn list(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ListResponse<AudioCollection>>> {
    let limit = clamp_limit(params.limit);
    let offset = clamp_offset(params.offset);

    let (collections, total) =
        CollectionRepo::list_by_owner(&state.pool, auth_user.user_id, limit, offset).await?;
    Ok(Json(ListResponse {
        data: collections,
        total,
    }))
}

/// GET /api/v1/collections/{id}
///
/// Fetch a collection with its ordered track ids. Owner only.
pub async fn get(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CollectionDetails>>> {
    let collection = find_owned(&state, id, auth_user.user_id).await?;
    let track_ids = CollectionRepo::track_ids(&state.pool, id).await?;

    Ok(Json(DataResponse {
        data: CollectionDetails {
            collection,
            track_ids,
        },
    }))
}

/// PUT /api/v1/collections/{id}
///
/// Update title/description. Owner only.
pub async fn update(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCollection>,
) -> AppResult<Json<DataResponse<AudioCollection>>> {
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::InvalidArgument(
            "title is required".into(),
        )));
    }

    let updated = CollectionRepo::update_metadata(&state.pool, id, auth_user.user_id, &input)
        .await?;

    match updated {
        Some(collection) => Ok(Json(DataResponse { data: collection })),
        // No row matched: distinguish "absent" from "not yours".
        None => {
            if CollectionRepo::exists(&state.pool, id).await? {
                Err(AppError::Core(CoreError::PermissionDenied(
                    "only the owner can modify a collection".into(),
                )))
            } else {
                Err(AppError::Core(CoreError::NotFound {
                    entity: "collection",
                    id,
                }))
            }
        }
    }
}

/// DELETE /api/v1/collections/{id}
///
/// Delete a collection and its membership rows. Owner only.
pub async fn delete(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_owned(&state, id, auth_user.user_id).await?;
    CollectionRepo::delete(&state.pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/v1/collections/{id}/tracks
///
/// Atomically replace the collection's entire ordered track list.
///
/// The response echoes the stored list. On any error (unknown track,
/// duplicate id, foreign collection) the previous membership is intact.
pub async fn replace_tracks(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<ReplaceTracksRequest>,
) -> AppResult<Json<DataResponse<Vec<DbId>>>> {
    // Reject structurally bad input before touching the database.
    ensure_unique_track_ids(&input.track_ids).map_err(AppError::Core)?;

    let user_id = auth_user.user_id;
    let track_ids = input.track_ids;

    let stored = state
        .tx
        .execute(move |conn| {
            Box::pin(async move {
                let collection = CollectionRepo::find_by_id(&mut *conn, id)
                    .await?
                    .ok_or(CoreError::NotFound {
                        entity: "collection",
                        id,
                    })?;
                if collection.owner_id != user_id {
                    return Err(CoreError::PermissionDenied(
                        "only the owner can modify a collection".into(),
                    ));
                }

                let existing = TrackRepo::list_existing_ids(&mut *conn, &track_ids).await?;
                ensure_tracks_exist(&track_ids, &existing)?;

                CollectionRepo::replace_tracks(conn, id, &track_ids).await?;
                Ok(track_ids)
            })
        })
        .await?;

    Ok(Json(DataResponse { data: stored }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a collection and verify ownership.
async fn find_owned(
    state: &AppState,
    id: DbId,
    user_id: DbId,
) -> Result<AudioCollection, AppError> {
    let collection = CollectionRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "collection",
                id,
            })
        })?;

    if collection.owner_id != user_id {
        return Err(AppError::Core(CoreError::PermissionDenied(
            "only the owner can access this collection".into(),
        )));
    }
    Ok(collection)
}
