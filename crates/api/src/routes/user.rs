use axum::routing::get;
use axum::Router;

use crate::handlers::user;
use crate::state::AppState;

/// Mount `/users` routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(user::me))
}
