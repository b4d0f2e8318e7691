//! Repository for the `users` table.

use lingopod_core::error::CoreError;
use lingopod_core::types::DbId;
use sqlx::PgPool;

use crate::error::map_db_err;
use crate::models::user::{CreateUser, User};

/// Column list shared across queries.
const COLUMNS: &str = "id, email, name, password_hash, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user. A duplicate email surfaces as `Conflict`.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, CoreError> {
        let query = format!(
            "INSERT INTO users (email, name, password_hash) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.email)
            .bind(&input.name)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
            .map_err(|e| map_db_err("creating user", e))
    }

    /// Find a user by primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, CoreError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
            .map_err(|e| map_db_err("finding user", e))
    }

    /// Find a user by email (the login identifier).
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, CoreError> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE email = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
            .map_err(|e| map_db_err("finding user by email", e))
    }
}
