//! Repository for refresh-token sessions.

use lingopod_core::error::CoreError;
use lingopod_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::error::map_db_err;
use crate::models::session::Session;

const COLUMNS: &str = "id, user_id, token_hash, expires_at, created_at";

/// Provides operations on the `sessions` table.
pub struct SessionRepo;

impl SessionRepo {
    /// Persist a new session for a hashed refresh token.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<Session, CoreError> {
        let query = format!(
            "INSERT INTO sessions (user_id, token_hash, expires_at) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(user_id)
            .bind(token_hash)
            .bind(expires_at)
            .fetch_one(pool)
            .await
            .map_err(|e| map_db_err("creating session", e))
    }

    /// Look up an unexpired session by token hash.
    pub async fn find_valid(pool: &PgPool, token_hash: &str) -> Result<Option<Session>, CoreError> {
        let query = format!(
            "SELECT {COLUMNS} FROM sessions \
             WHERE token_hash = $1 AND expires_at > now()"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(token_hash)
            .fetch_optional(pool)
            .await
            .map_err(|e| map_db_err("finding session", e))
    }

    /// Delete a session by token hash (logout / rotation).
    pub async fn delete(pool: &PgPool, token_hash: &str) -> Result<bool, CoreError> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(pool)
            .await
            .map_err(|e| map_db_err("deleting session", e))?;
        Ok(result.rows_affected() > 0)
    }
}
