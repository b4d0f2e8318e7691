pub mod activity;
pub mod auth;
pub mod collection;
pub mod health;
pub mod track;
pub mod upload;
pub mod user;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                       register (public)
/// /auth/login                          login (public)
/// /auth/refresh                        refresh (public)
/// /auth/logout                         logout (public, token in body)
///
/// /users/me                            profile (requires auth)
///
/// /tracks                              list public catalog
/// /tracks/{id}                         get + presigned stream URL, delete
///
/// /collections                         list own, create
/// /collections/{id}                    get, update metadata, delete
/// /collections/{id}/tracks             replace ordered membership (PUT)
///
/// /uploads/request                     presign single upload (POST)
/// /uploads/complete                    register single upload (POST)
/// /uploads/batch/request               presign batch (POST)
/// /uploads/batch/complete              register batch atomically (POST)
///
/// /progress                            listening history (GET)
/// /progress/{track_id}                 get, update (PUT)
///
/// /bookmarks                           list, create
/// /bookmarks/{id}                      delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (register, login, refresh, logout).
        .nest("/auth", auth::router())
        // Authenticated user profile.
        .nest("/users", user::router())
        // Public audio catalog.
        .nest("/tracks", track::router())
        // Collections and their ordered track membership.
        .nest("/collections", collection::router())
        // Presigned upload protocol (single + batch).
        .nest("/uploads", upload::router())
        // Playback progress and bookmarks.
        .merge(activity::router())
}
