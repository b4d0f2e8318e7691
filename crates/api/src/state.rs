use std::sync::Arc;

use lingopod_db::tx::TxManager;

use crate::config::ServerConfig;
use crate::storage::ObjectStorage;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: lingopod_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Transaction manager for multi-statement write paths.
    pub tx: TxManager,
    /// Object storage backend (MinIO in development, any S3-compatible
    /// store in production). Behind a trait so tests can substitute a fake.
    pub storage: Arc<dyn ObjectStorage>,
}
