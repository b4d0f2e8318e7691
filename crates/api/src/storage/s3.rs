//! S3/MinIO implementation of [`ObjectStorage`].

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;

use lingopod_core::error::CoreError;

use crate::config::StorageConfig;
use crate::storage::ObjectStorage;

/// Presigned-URL client for an S3-compatible store.
///
/// `force_path_style` is enabled because MinIO serves buckets as path
/// segments rather than virtual hosts.
pub struct S3Storage {
    client: Client,
}

impl S3Storage {
    pub fn new(config: &StorageConfig) -> Self {
        let credentials = Credentials::new(
            config.access_key.clone(),
            config.secret_key.clone(),
            None,
            None,
            "lingopod-config",
        );

        let s3_config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .endpoint_url(&config.endpoint)
            .credentials_provider(credentials)
            .force_path_style(true)
            .build();

        Self {
            client: Client::from_conf(s3_config),
        }
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, CoreError> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| CoreError::Internal(format!("invalid presign expiry: {e}")))?;

        let presigned = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, %key, "Failed to presign upload URL");
                CoreError::Internal(format!("failed to presign upload URL: {e}"))
            })?;

        Ok(presigned.uri().to_string())
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, CoreError> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| CoreError::Internal(format!("invalid presign expiry: {e}")))?;

        let presigned = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, %key, "Failed to presign download URL");
                CoreError::Internal(format!("failed to presign download URL: {e}"))
            })?;

        Ok(presigned.uri().to_string())
    }

    async fn object_exists(&self, bucket: &str, key: &str) -> Result<bool, CoreError> {
        match self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(err) => {
                if err
                    .as_service_error()
                    .map(|e| e.is_not_found())
                    .unwrap_or(false)
                {
                    Ok(false)
                } else {
                    tracing::error!(error = %err, %key, "HEAD request to object store failed");
                    Err(CoreError::Internal(format!(
                        "object store HEAD failed: {err}"
                    )))
                }
            }
        }
    }
}
