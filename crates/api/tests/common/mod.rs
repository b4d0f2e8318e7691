//! Shared helpers for API integration tests.
//!
//! Builds the real application router (same middleware stack as
//! production) on top of a per-test database, with object storage
//! replaced by an in-memory fake.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use lingopod_api::auth::jwt::JwtConfig;
use lingopod_api::config::{ServerConfig, StorageConfig};
use lingopod_api::router::build_app_router;
use lingopod_api::state::AppState;
use lingopod_api::storage::ObjectStorage;
use lingopod_core::error::CoreError;
use lingopod_db::tx::TxManager;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-with-enough-entropy".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 30,
        },
        storage: StorageConfig {
            endpoint: "http://storage.test".to_string(),
            region: "us-east-1".to_string(),
            access_key: "test".to_string(),
            secret_key: "test".to_string(),
            bucket: "audio".to_string(),
            presign_expiry_secs: 900,
        },
    }
}

/// In-memory stand-in for the S3 client. Every object exists unless its
/// key was registered as absent; presigned URLs are deterministic fakes.
pub struct FakeStorage {
    absent_keys: HashSet<String>,
}

impl FakeStorage {
    pub fn new() -> Self {
        Self {
            absent_keys: HashSet::new(),
        }
    }

    pub fn with_absent_keys(keys: impl IntoIterator<Item = String>) -> Self {
        Self {
            absent_keys: keys.into_iter().collect(),
        }
    }
}

#[async_trait]
impl ObjectStorage for FakeStorage {
    async fn presign_put(
        &self,
        bucket: &str,
        key: &str,
        _expires_in: Duration,
    ) -> Result<String, CoreError> {
        Ok(format!("http://storage.test/{bucket}/{key}?method=put"))
    }

    async fn presign_get(
        &self,
        bucket: &str,
        key: &str,
        _expires_in: Duration,
    ) -> Result<String, CoreError> {
        Ok(format!("http://storage.test/{bucket}/{key}?method=get"))
    }

    async fn object_exists(&self, _bucket: &str, key: &str) -> Result<bool, CoreError> {
        Ok(!self.absent_keys.contains(key))
    }
}

/// Build the full application router against the given pool, with all
/// objects present in fake storage.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_storage(pool, FakeStorage::new())
}

/// Build the application router with a caller-configured fake storage.
pub fn build_test_app_with_storage(pool: PgPool, storage: FakeStorage) -> Router {
    let config = test_config();
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        tx: TxManager::new(&pool),
        storage: Arc::new(storage),
    };
    build_app_router(state, &config)
}

/// Send a JSON request through the router and return the response.
pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user through the API and return `(access_token, user_id)`.
pub async fn register_user(app: &Router, email: &str) -> (String, uuid::Uuid) {
    let response = send_json(
        app,
        "POST",
        "/api/v1/auth/register",
        None,
        Some(serde_json::json!({
            "email": email,
            "name": "Test User",
            "password": "a-strong-enough-password",
        })),
    )
    .await;
    assert_eq!(response.status(), 201, "registration should succeed");

    let json = body_json(response).await;
    let token = json["access_token"].as_str().unwrap().to_string();
    let user_id = json["user"]["id"].as_str().unwrap().parse().unwrap();
    (token, user_id)
}
