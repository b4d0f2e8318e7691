use axum::routing::post;
use axum::Router;

use crate::handlers::upload;
use crate::state::AppState;

/// Mount `/uploads` routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/request", post(upload::request_upload))
        .route("/complete", post(upload::complete_upload))
        .route("/batch/request", post(upload::request_batch_upload))
        .route("/batch/complete", post(upload::complete_batch_upload))
}
