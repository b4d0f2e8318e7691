//! Repository for the `playback_progress` table.

use lingopod_core::error::CoreError;
use lingopod_core::types::DbId;
use sqlx::PgPool;

use crate::error::map_db_err;
use crate::models::activity::PlaybackProgress;

const COLUMNS: &str = "user_id, track_id, progress_ms, last_listened_at";

/// Provides upsert-style operations for playback progress.
pub struct ProgressRepo;

impl ProgressRepo {
    /// Record progress for a user/track pair, inserting or overwriting.
    ///
    /// An FK violation (unknown track) surfaces as `InvalidArgument`.
    pub async fn upsert(
        pool: &PgPool,
        user_id: DbId,
        track_id: DbId,
        progress_ms: i64,
    ) -> Result<PlaybackProgress, CoreError> {
        let query = format!(
            "INSERT INTO playback_progress (user_id, track_id, progress_ms, last_listened_at) \
             VALUES ($1, $2, $3, now()) \
             ON CONFLICT (user_id, track_id) DO UPDATE \
                SET progress_ms = EXCLUDED.progress_ms, last_listened_at = now() \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PlaybackProgress>(&query)
            .bind(user_id)
            .bind(track_id)
            .bind(progress_ms)
            .fetch_one(pool)
            .await
            .map_err(|e| map_db_err("recording playback progress", e))
    }

    /// Fetch progress for one user/track pair.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        track_id: DbId,
    ) -> Result<Option<PlaybackProgress>, CoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM playback_progress \
             WHERE user_id = $1 AND track_id = $2"
        );
        sqlx::query_as::<_, PlaybackProgress>(&query)
            .bind(user_id)
            .bind(track_id)
            .fetch_optional(pool)
            .await
            .map_err(|e| map_db_err("finding playback progress", e))
    }

    /// List a user's progress rows, most recently listened first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<PlaybackProgress>, i64), CoreError> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM playback_progress WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(pool)
                .await
                .map_err(|e| map_db_err("counting playback progress", e))?;

        let query = format!(
            "SELECT {COLUMNS} FROM playback_progress \
             WHERE user_id = $1 \
             ORDER BY last_listened_at DESC LIMIT $2 OFFSET $3"
        );
        let rows = sqlx::query_as::<_, PlaybackProgress>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
            .map_err(|e| map_db_err("listing playback progress", e))?;

        Ok((rows, total))
    }
}
