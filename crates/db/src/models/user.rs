use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use lingopod_core::types::{DbId, Timestamp};

/// A row from the `users` table.
///
/// `password_hash` is `None` for accounts provisioned through an external
/// identity provider; such accounts cannot log in with a password.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub name: String,
    pub password_hash: Option<String>,
}
