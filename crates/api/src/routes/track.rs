use axum::routing::get;
use axum::Router;

use crate::handlers::track;
use crate::state::AppState;

/// Mount `/tracks` routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(track::list))
        .route("/{id}", get(track::get).delete(track::delete))
}
