//! Repository for the `bookmarks` table.

use lingopod_core::error::CoreError;
use lingopod_core::types::DbId;
use sqlx::PgPool;

use crate::error::map_db_err;
use crate::models::activity::{Bookmark, CreateBookmark};

const COLUMNS: &str = "id, user_id, track_id, timestamp_ms, note, created_at";

/// Provides CRUD operations for bookmarks.
pub struct BookmarkRepo;

impl BookmarkRepo {
    /// Insert a bookmark for the given user.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateBookmark,
    ) -> Result<Bookmark, CoreError> {
        let query = format!(
            "INSERT INTO bookmarks (user_id, track_id, timestamp_ms, note) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Bookmark>(&query)
            .bind(user_id)
            .bind(input.track_id)
            .bind(input.timestamp_ms)
            .bind(&input.note)
            .fetch_one(pool)
            .await
            .map_err(|e| map_db_err("creating bookmark", e))
    }

    /// List a user's bookmarks, optionally scoped to one track, ordered
    /// by position in the audio.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        track_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Bookmark>, i64), CoreError> {
        let filter = if track_id.is_some() {
            "user_id = $1 AND track_id = $4"
        } else {
            "user_id = $1"
        };

        let total_sql = format!(
            "SELECT COUNT(*) FROM bookmarks WHERE {}",
            if track_id.is_some() {
                "user_id = $1 AND track_id = $2"
            } else {
                "user_id = $1"
            }
        );
        let mut total_query = sqlx::query_scalar::<_, i64>(&total_sql).bind(user_id);
        if let Some(track) = track_id {
            total_query = total_query.bind(track);
        }
        let total = total_query
            .fetch_one(pool)
            .await
            .map_err(|e| map_db_err("counting bookmarks", e))?;

        let query = format!(
            "SELECT {COLUMNS} FROM bookmarks \
             WHERE {filter} \
             ORDER BY timestamp_ms ASC LIMIT $2 OFFSET $3"
        );
        let mut list_query = sqlx::query_as::<_, Bookmark>(&query)
            .bind(user_id)
            .bind(limit)
            .bind(offset);
        if let Some(track) = track_id {
            list_query = list_query.bind(track);
        }
        let bookmarks = list_query
            .fetch_all(pool)
            .await
            .map_err(|e| map_db_err("listing bookmarks", e))?;

        Ok((bookmarks, total))
    }

    /// Delete a bookmark, scoped to its owner.
    ///
    /// Returns `false` when no row matched (absent or not owned).
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, CoreError> {
        let result = sqlx::query("DELETE FROM bookmarks WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await
            .map_err(|e| map_db_err("deleting bookmark", e))?;
        Ok(result.rows_affected() > 0)
    }
}
