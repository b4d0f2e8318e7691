//! Repository for the `audio_tracks` table.

use lingopod_core::error::CoreError;
use lingopod_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::error::map_db_err;
use crate::models::track::{AudioTrack, CreateAudioTrack, TrackFilters};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, language_code, level, duration_ms, \
    minio_bucket, minio_object_key, cover_image_url, uploader_id, is_public, tags, \
    created_at, updated_at";

/// Provides operations on audio tracks.
///
/// `create` and the id-existence queries take an executor so they can run
/// inside a caller-owned transaction (batch completion, collection
/// replace pre-checks).
pub struct TrackRepo;

impl TrackRepo {
    /// Insert a new track, returning the created row.
    ///
    /// A duplicate `(minio_bucket, minio_object_key)` pair surfaces as
    /// `Conflict`.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateAudioTrack,
    ) -> Result<AudioTrack, CoreError> {
        let query = format!(
            "INSERT INTO audio_tracks \
                (title, description, language_code, level, duration_ms, \
                 minio_bucket, minio_object_key, cover_image_url, uploader_id, \
                 is_public, tags) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AudioTrack>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.language_code)
            .bind(&input.level)
            .bind(input.duration_ms)
            .bind(&input.minio_bucket)
            .bind(&input.minio_object_key)
            .bind(&input.cover_image_url)
            .bind(input.uploader_id)
            .bind(input.is_public)
            .bind(&input.tags)
            .fetch_one(executor)
            .await
            .map_err(|e| map_db_err("creating audio track", e))
    }

    /// Find a track by its primary key.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<AudioTrack>, CoreError> {
        let query = format!("SELECT {COLUMNS} FROM audio_tracks WHERE id = $1");
        sqlx::query_as::<_, AudioTrack>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(|e| map_db_err("finding audio track", e))
    }

    /// Return the subset of `ids` that exist, in arbitrary order.
    ///
    /// Used by the use-case layer to pre-validate track references before
    /// a collection replace.
    pub async fn list_existing_ids(
        executor: impl PgExecutor<'_>,
        ids: &[DbId],
    ) -> Result<Vec<DbId>, CoreError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar::<_, DbId>("SELECT id FROM audio_tracks WHERE id = ANY($1)")
            .bind(ids)
            .fetch_all(executor)
            .await
            .map_err(|e| map_db_err("checking track existence", e))
    }

    /// List public tracks with optional filters, newest first.
    ///
    /// Returns the page of rows plus the total match count.
    pub async fn list(
        pool: &PgPool,
        filters: &TrackFilters,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<AudioTrack>, i64), CoreError> {
        let mut conditions = vec!["is_public = true".to_string()];
        let mut arg = 1;
        if filters.language_code.is_some() {
            conditions.push(format!("language_code = ${arg}"));
            arg += 1;
        }
        if filters.level.is_some() {
            conditions.push(format!("level = ${arg}"));
            arg += 1;
        }
        if filters.query.is_some() {
            conditions.push(format!("title ILIKE ${arg}"));
            arg += 1;
        }
        let where_clause = conditions.join(" AND ");

        let count_sql = format!("SELECT COUNT(*) FROM audio_tracks WHERE {where_clause}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
        if let Some(lang) = &filters.language_code {
            count_query = count_query.bind(lang);
        }
        if let Some(level) = &filters.level {
            count_query = count_query.bind(level);
        }
        if let Some(q) = &filters.query {
            count_query = count_query.bind(format!("%{q}%"));
        }
        let total = count_query
            .fetch_one(pool)
            .await
            .map_err(|e| map_db_err("counting tracks", e))?;

        let list_sql = format!(
            "SELECT {COLUMNS} FROM audio_tracks WHERE {where_clause} \
             ORDER BY created_at DESC LIMIT ${arg} OFFSET ${}",
            arg + 1
        );
        let mut list_query = sqlx::query_as::<_, AudioTrack>(&list_sql);
        if let Some(lang) = &filters.language_code {
            list_query = list_query.bind(lang);
        }
        if let Some(level) = &filters.level {
            list_query = list_query.bind(level);
        }
        if let Some(q) = &filters.query {
            list_query = list_query.bind(format!("%{q}%"));
        }
        let tracks = list_query
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
            .map_err(|e| map_db_err("listing tracks", e))?;

        Ok((tracks, total))
    }

    /// Delete a track by id. Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, CoreError> {
        let result = sqlx::query("DELETE FROM audio_tracks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| map_db_err("deleting audio track", e))?;
        Ok(result.rows_affected() > 0)
    }
}
