//! Handlers for the `/uploads` resource.
//!
//! Uploads are a two-step protocol: the client first requests a presigned
//! PUT URL (single or batch), uploads bytes directly to the object store,
//! then calls a completion endpoint to register the object(s) as tracks.
//! Batch completion is all-or-nothing: every item is validated and probed
//! before any row is written, and the insert phase runs in one
//! transaction. The response always carries one report per item.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use lingopod_core::error::CoreError;
use lingopod_core::upload::{
    demote_uncommitted, object_key_for, precheck_batch, validate_spec, BatchItemReport,
    TrackUploadSpec,
};
use lingopod_core::value::LanguageCode;
use lingopod_db::models::track::{AudioTrack, CreateAudioTrack};
use lingopod_db::repositories::TrackRepo;

use crate::error::{classify_core_error, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /uploads/request`.
#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub filename: String,
}

/// Request body for `POST /uploads/batch/request`.
#[derive(Debug, Deserialize)]
pub struct BatchUploadRequest {
    pub filenames: Vec<String>,
}

/// One presigned upload slot.
#[derive(Debug, Serialize)]
pub struct UploadSlot {
    pub filename: String,
    pub object_key: String,
    pub upload_url: String,
    /// URL lifetime in seconds.
    pub expires_in: u64,
}

/// Request body for `POST /uploads/batch/complete`.
#[derive(Debug, Deserialize)]
pub struct BatchCompleteRequest {
    pub items: Vec<TrackUploadSpec>,
}

/// Response body for `POST /uploads/batch/complete` -- one report per
/// submitted item, in input order, plus whether the batch committed.
#[derive(Debug, Serialize)]
pub struct BatchCompleteResponse {
    pub committed: bool,
    pub reports: Vec<BatchItemReport>,
}

/// Upper bound on batch size; larger requests are rejected outright.
const MAX_BATCH_ITEMS: usize = 50;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/uploads/request
///
/// Issue a presigned PUT URL for one file.
pub async fn request_upload(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<UploadRequest>,
) -> AppResult<Json<DataResponse<UploadSlot>>> {
    let slot = make_slot(&state, auth_user.user_id, &input.filename).await?;
    Ok(Json(DataResponse { data: slot }))
}

/// POST /api/v1/uploads/batch/request
///
/// Issue presigned PUT URLs for a set of files.
pub async fn request_batch_upload(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<BatchUploadRequest>,
) -> AppResult<Json<DataResponse<Vec<UploadSlot>>>> {
    if input.filenames.is_empty() {
        return Err(AppError::Core(CoreError::InvalidArgument(
            "filenames must not be empty".into(),
        )));
    }
    if input.filenames.len() > MAX_BATCH_ITEMS {
        return Err(AppError::Core(CoreError::InvalidArgument(format!(
            "batch size exceeds the maximum of {MAX_BATCH_ITEMS} items"
        ))));
    }

    let mut slots = Vec::with_capacity(input.filenames.len());
    for filename in &input.filenames {
        slots.push(make_slot(&state, auth_user.user_id, filename).await?);
    }
    Ok(Json(DataResponse { data: slots }))
}

/// POST /api/v1/uploads/complete
///
/// Register one uploaded object as a track. The object must exist in
/// storage and live under the caller's own key prefix.
pub async fn complete_upload(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(spec): Json<TrackUploadSpec>,
) -> AppResult<(StatusCode, Json<DataResponse<AudioTrack>>)> {
    validate_spec(auth_user.user_id, &spec).map_err(AppError::Core)?;

    let bucket = state.config.storage.bucket.clone();
    let exists = state.storage.object_exists(&bucket, &spec.object_key).await?;
    if !exists {
        return Err(AppError::Core(CoreError::InvalidArgument(format!(
            "object '{}' was not found in storage",
            spec.object_key
        ))));
    }

    let track = TrackRepo::create(
        &state.pool,
        &create_from_spec(auth_user.user_id, &bucket, &spec)?,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: track })))
}

/// POST /api/v1/uploads/batch/complete
///
/// Register a set of uploaded objects as tracks, atomically.
///
/// Phase 1 validates every item and probes storage without writing
/// anything; any failure rejects the whole batch with per-item reports
/// (400). Phase 2 inserts all items in one transaction; if it rolls
/// back, items that were individually valid are demoted in the report
/// since none of them was committed.
pub async fn complete_batch_upload(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(input): Json<BatchCompleteRequest>,
) -> AppResult<Response> {
    if input.items.is_empty() {
        return Err(AppError::Core(CoreError::InvalidArgument(
            "items must not be empty".into(),
        )));
    }
    if input.items.len() > MAX_BATCH_ITEMS {
        return Err(AppError::Core(CoreError::InvalidArgument(format!(
            "batch size exceeds the maximum of {MAX_BATCH_ITEMS} items"
        ))));
    }

    let bucket = state.config.storage.bucket.clone();

    // Phase 1: structural validation, then storage probes for the
    // survivors. No database writes happen here.
    let (mut reports, mut precheck_failed) = precheck_batch(auth_user.user_id, &input.items);
    for (item, report) in input.items.iter().zip(reports.iter_mut()) {
        if !report.success {
            continue;
        }
        if !state.storage.object_exists(&bucket, &item.object_key).await? {
            report.success = false;
            report.error = Some("object not found in storage".into());
            precheck_failed = true;
        }
    }

    if precheck_failed {
        tracing::warn!(
            user_id = %auth_user.user_id,
            items = input.items.len(),
            "Batch completion rejected in pre-check phase"
        );
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(BatchCompleteResponse {
                committed: false,
                reports,
            }),
        )
            .into_response());
    }

    // Phase 2: insert every item in one transaction.
    let inserts: Vec<CreateAudioTrack> = input
        .items
        .iter()
        .map(|item| create_from_spec(auth_user.user_id, &bucket, item))
        .collect::<Result<_, _>>()?;

    let failed_at = Arc::new(AtomicUsize::new(usize::MAX));
    let failed_probe = Arc::clone(&failed_at);
    let outcome = state
        .tx
        .execute(move |conn| {
            Box::pin(async move {
                let mut ids = Vec::with_capacity(inserts.len());
                for (i, input) in inserts.iter().enumerate() {
                    let track = TrackRepo::create(&mut *conn, input).await.map_err(|e| {
                        failed_probe.store(i, Ordering::Relaxed);
                        e
                    })?;
                    ids.push(track.id);
                }
                Ok(ids)
            })
        })
        .await;

    match outcome {
        Ok(ids) => {
            for (report, id) in reports.iter_mut().zip(ids) {
                report.track_id = Some(id);
            }
            tracing::info!(
                user_id = %auth_user.user_id,
                count = reports.len(),
                "Batch upload committed"
            );
            Ok((
                StatusCode::CREATED,
                Json(BatchCompleteResponse {
                    committed: true,
                    reports,
                }),
            )
                .into_response())
        }
        Err(err) => {
            let (status, _, message) = classify_core_error(&err);
            // The offending item keeps the specific error; everything else
            // is demoted since nothing was committed.
            if let Some(report) = reports.get_mut(failed_at.load(Ordering::Relaxed)) {
                report.success = false;
                report.error = Some(message.clone());
            }
            demote_uncommitted(&mut reports);
            tracing::warn!(
                user_id = %auth_user.user_id,
                error = %message,
                "Batch upload rolled back in insert phase"
            );
            Ok((
                status,
                Json(BatchCompleteResponse {
                    committed: false,
                    reports,
                }),
            )
                .into_response())
        }
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Generate an owned object key and presign its upload URL.
async fn make_slot(state: &AppState, user_id: lingopod_core::types::DbId, filename: &str) -> Result<UploadSlot, AppError> {
    if filename.trim().is_empty() {
        return Err(AppError::Core(CoreError::InvalidArgument(
            "filename is required".into(),
        )));
    }

    let object_key = object_key_for(user_id, filename);
    let expires_in = state.config.storage.presign_expiry_secs;
    let upload_url = state
        .storage
        .presign_put(
            &state.config.storage.bucket,
            &object_key,
            Duration::from_secs(expires_in),
        )
        .await?;

    Ok(UploadSlot {
        filename: filename.to_string(),
        object_key,
        upload_url,
        expires_in,
    })
}

/// Build the insert DTO from a validated upload spec.
fn create_from_spec(
    user_id: lingopod_core::types::DbId,
    bucket: &str,
    spec: &TrackUploadSpec,
) -> Result<CreateAudioTrack, AppError> {
    let language = LanguageCode::new(&spec.language_code).map_err(AppError::Core)?;
    Ok(CreateAudioTrack {
        title: spec.title.trim().to_string(),
        description: spec.description.clone(),
        language_code: language.as_str().to_string(),
        level: spec.level.clone(),
        duration_ms: spec.duration_ms,
        minio_bucket: bucket.to_string(),
        minio_object_key: spec.object_key.clone(),
        cover_image_url: spec.cover_image_url.clone(),
        uploader_id: Some(user_id),
        is_public: spec.is_public,
        tags: spec.tags.clone(),
    })
}
