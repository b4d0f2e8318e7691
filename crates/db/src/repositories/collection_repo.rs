//! Repository for `audio_collections` and its ordered track membership.
//!
//! The `collection_tracks` rows are fully owned by the collection: the
//! only write path is [`CollectionRepo::replace_tracks`], a whole-set
//! delete-then-reinsert. Positional density and uniqueness fall out of
//! the rewrite; incremental diffing was rejected as not worth the
//! gap-management logic for collections of tens to low hundreds of
//! tracks.

use lingopod_core::error::CoreError;
use lingopod_core::types::DbId;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::error::map_db_err;
use crate::models::collection::{AudioCollection, CreateCollection, UpdateCollection};

/// Column list for collection queries.
const COLUMNS: &str = "id, title, description, owner_id, type, created_at, updated_at";

/// Provides operations on audio collections.
pub struct CollectionRepo;

impl CollectionRepo {
    /// Insert a new collection, returning the created row.
    pub async fn create(
        executor: impl PgExecutor<'_>,
        input: &CreateCollection,
    ) -> Result<AudioCollection, CoreError> {
        let query = format!(
            "INSERT INTO audio_collections (title, description, owner_id, type) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AudioCollection>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.owner_id)
            .bind(&input.collection_type)
            .fetch_one(executor)
            .await
            .map_err(|e| map_db_err("creating collection", e))
    }

    /// Find a collection by its primary key.
    pub async fn find_by_id(
        executor: impl PgExecutor<'_>,
        id: DbId,
    ) -> Result<Option<AudioCollection>, CoreError> {
        let query = format!("SELECT {COLUMNS} FROM audio_collections WHERE id = $1");
        sqlx::query_as::<_, AudioCollection>(&query)
            .bind(id)
            .fetch_optional(executor)
            .await
            .map_err(|e| map_db_err("finding collection", e))
    }

    /// List collections owned by a user, newest first, plus total count.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<AudioCollection>, i64), CoreError> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM audio_collections WHERE owner_id = $1",
        )
        .bind(owner_id)
        .fetch_one(pool)
        .await
        .map_err(|e| map_db_err("counting collections", e))?;

        let query = format!(
            "SELECT {COLUMNS} FROM audio_collections \
             WHERE owner_id = $1 \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );
        let collections = sqlx::query_as::<_, AudioCollection>(&query)
            .bind(owner_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
            .map_err(|e| map_db_err("listing collections", e))?;

        Ok((collections, total))
    }

    /// Update title/description, owner-scoped via the WHERE clause.
    ///
    /// Returns `None` when no row matched; the caller decides between
    /// `NotFound` and `PermissionDenied` by checking existence.
    pub async fn update_metadata(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        input: &UpdateCollection,
    ) -> Result<Option<AudioCollection>, CoreError> {
        let query = format!(
            "UPDATE audio_collections SET \
                title = $3, \
                description = COALESCE($4, description), \
                updated_at = now() \
             WHERE id = $1 AND owner_id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AudioCollection>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
            .map_err(|e| map_db_err("updating collection metadata", e))
    }

    /// Check whether a collection exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, CoreError> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM audio_collections WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(pool)
        .await
        .map_err(|e| map_db_err("checking collection existence", e))
    }

    /// Delete a collection; `collection_tracks` rows cascade.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, CoreError> {
        let result = sqlx::query("DELETE FROM audio_collections WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await
            .map_err(|e| map_db_err("deleting collection", e))?;
        Ok(result.rows_affected() > 0)
    }

    /// Fetch the ordered track ids for a collection.
    pub async fn track_ids(
        executor: impl PgExecutor<'_>,
        collection_id: DbId,
    ) -> Result<Vec<DbId>, CoreError> {
        sqlx::query_scalar::<_, DbId>(
            "SELECT track_id FROM collection_tracks \
             WHERE collection_id = $1 \
             ORDER BY position ASC",
        )
        .bind(collection_id)
        .fetch_all(executor)
        .await
        .map_err(|e| map_db_err("fetching collection track ids", e))
    }

    /// Replace the entire track set of a collection.
    ///
    /// Must run inside a caller-owned transaction: deletes every existing
    /// association row, reinserts `(collection_id, track_id, position)`
    /// with dense 0-based positions in input order, and bumps the
    /// collection's `updated_at`. Any insert failure (including an FK
    /// violation on a nonexistent track) aborts the whole operation, so
    /// a rollback restores the previous set exactly.
    pub async fn replace_tracks(
        conn: &mut PgConnection,
        collection_id: DbId,
        ordered_track_ids: &[DbId],
    ) -> Result<(), CoreError> {
        sqlx::query("DELETE FROM collection_tracks WHERE collection_id = $1")
            .bind(collection_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| map_db_err("deleting old collection tracks", e))?;

        for (position, track_id) in ordered_track_ids.iter().enumerate() {
            sqlx::query(
                "INSERT INTO collection_tracks (collection_id, track_id, position) \
                 VALUES ($1, $2, $3)",
            )
            .bind(collection_id)
            .bind(track_id)
            .bind(position as i32)
            .execute(&mut *conn)
            .await
            .map_err(|e| map_db_err("inserting collection track", e))?;
        }

        sqlx::query("UPDATE audio_collections SET updated_at = now() WHERE id = $1")
            .bind(collection_id)
            .execute(&mut *conn)
            .await
            .map_err(|e| map_db_err("touching collection timestamp", e))?;

        tracing::debug!(
            %collection_id,
            track_count = ordered_track_ids.len(),
            "Replaced collection track set"
        );
        Ok(())
    }
}
