//! Upload completion: object-key ownership and the batch pre-check phase.
//!
//! Batch completion is two-phase. The pre-check here validates every item
//! independently before any row is written; the insert phase then commits
//! all surviving items in one transaction. An item report therefore goes
//! through `pending -> validated -> (inserted | rejected)`, and `inserted`
//! is only reachable if that transaction commits. A per-item
//! `success = true` in the final report means "individually valid and
//! committed with the batch", never "individually committed".

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::types::DbId;
use crate::value::{AudioLevel, LanguageCode};

/// Key prefix under which all user uploads live in the bucket.
pub const UPLOAD_KEY_PREFIX: &str = "user-uploads";

/// Caller-supplied description of one uploaded object to be registered
/// as an audio track.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackUploadSpec {
    pub object_key: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub language_code: String,
    #[serde(default)]
    pub level: String,
    pub duration_ms: i64,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub cover_image_url: Option<String>,
}

/// Per-item outcome of a batch completion call.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItemReport {
    pub object_key: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_id: Option<DbId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl BatchItemReport {
    fn validated(object_key: &str) -> Self {
        Self {
            object_key: object_key.to_string(),
            success: true,
            track_id: None,
            error: None,
        }
    }

    fn rejected(object_key: &str, error: String) -> Self {
        Self {
            object_key: object_key.to_string(),
            success: false,
            track_id: None,
            error: Some(error),
        }
    }
}

/// Generate a fresh object key for an upload: `user-uploads/{user}/{uuid}{ext}`.
///
/// The original filename only contributes its extension; the random stem
/// keeps keys collision-free and unguessable.
pub fn object_key_for(user_id: DbId, filename: &str) -> String {
    let extension = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default();
    format!("{UPLOAD_KEY_PREFIX}/{user_id}/{}{extension}", Uuid::new_v4())
}

/// Reject an object key that does not live under the caller's own prefix.
pub fn ensure_owned_object_key(user_id: DbId, object_key: &str) -> Result<(), CoreError> {
    let expected = format!("{UPLOAD_KEY_PREFIX}/{user_id}/");
    if !object_key.starts_with(&expected) {
        return Err(CoreError::PermissionDenied(
            "object key does not belong to the requesting user".into(),
        ));
    }
    Ok(())
}

/// Structural validation of a single upload spec (no I/O).
pub fn validate_spec(user_id: DbId, spec: &TrackUploadSpec) -> Result<(), CoreError> {
    if spec.object_key.is_empty() {
        return Err(CoreError::InvalidArgument("object_key is required".into()));
    }
    ensure_owned_object_key(user_id, &spec.object_key)?;
    if spec.title.trim().is_empty() {
        return Err(CoreError::InvalidArgument("title is required".into()));
    }
    if spec.duration_ms <= 0 {
        return Err(CoreError::InvalidArgument(
            "duration_ms must be positive".into(),
        ));
    }
    LanguageCode::new(&spec.language_code)?;
    AudioLevel::parse(&spec.level)?;
    Ok(())
}

/// Run the pre-check phase over a whole batch.
///
/// Returns one report per item (in input order) and whether any item
/// failed. Callers must treat any failure as rejecting the entire batch
/// before the insert phase.
pub fn precheck_batch(user_id: DbId, items: &[TrackUploadSpec]) -> (Vec<BatchItemReport>, bool) {
    let mut failed = false;
    let reports = items
        .iter()
        .map(|item| match validate_spec(user_id, item) {
            Ok(()) => BatchItemReport::validated(&item.object_key),
            Err(e) => {
                failed = true;
                BatchItemReport::rejected(&item.object_key, e.to_string())
            }
        })
        .collect();
    (reports, failed)
}

/// Demote every still-successful entry after a rolled-back insert phase.
///
/// The offending item keeps the specific error the insert phase recorded;
/// everything else was individually valid but is not durable.
pub fn demote_uncommitted(reports: &mut [BatchItemReport]) {
    for report in reports.iter_mut() {
        if report.success {
            report.success = false;
            report.track_id = None;
            report.error = Some("not committed: batch transaction rolled back".into());
        }
    }
}
