use sqlx::FromRow;

use lingopod_core::types::{DbId, Timestamp};

/// A refresh-token session row. Only the SHA-256 hash of the token is
/// stored; the plaintext never touches the database.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}
