//! Object storage abstraction.
//!
//! Audio bytes never pass through the API server: clients upload and
//! download directly against the object store using presigned URLs. The
//! trait seam exists so integration tests can substitute an in-memory
//! fake for the S3 client.

pub mod s3;

use std::time::Duration;

use async_trait::async_trait;
use lingopod_core::error::CoreError;

pub use s3::S3Storage;

/// Presigned-URL operations against an S3-compatible object store.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Presign a PUT for a client-side upload.
    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, CoreError>;

    /// Presign a GET for client-side playback/download.
    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, CoreError>;

    /// Check whether an object exists (HEAD request).
    async fn object_exists(&self, bucket: &str, key: &str) -> Result<bool, CoreError>;
}
