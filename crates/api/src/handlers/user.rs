//! Handlers for the `/users` resource.

use axum::extract::State;
use axum::Json;

use lingopod_core::error::CoreError;
use lingopod_db::models::user::User;
use lingopod_db::repositories::UserRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/users/me
///
/// Return the authenticated user's profile.
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> AppResult<Json<DataResponse<User>>> {
    let user = UserRepo::find_by_id(&state.pool, auth_user.user_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::NotFound {
                entity: "user",
                id: auth_user.user_id,
            })
        })?;

    Ok(Json(DataResponse { data: user }))
}
