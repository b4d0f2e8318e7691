use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::activity;
use crate::state::AppState;

/// Mount `/progress` and `/bookmarks` routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/progress", get(activity::list_progress))
        .route(
            "/progress/{track_id}",
            get(activity::get_progress).put(activity::update_progress),
        )
        .route(
            "/bookmarks",
            get(activity::list_bookmarks).post(activity::create_bookmark),
        )
        .route("/bookmarks/{id}", delete(activity::delete_bookmark))
}
