use axum::routing::{get, put};
use axum::Router;

use crate::handlers::collection;
use crate::state::AppState;

/// Mount `/collections` routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(collection::list).post(collection::create))
        .route(
            "/{id}",
            get(collection::get)
                .put(collection::update)
                .delete(collection::delete),
        )
        .route("/{id}/tracks", put(collection::replace_tracks))
}
