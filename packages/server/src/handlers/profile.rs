use axum::extract::{Path, State};
use common::UserProfile;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::state::AppState;
use crate::utils::account::find_profile;

#[utoipa::path(
    get,
    path = "/{user_id}",
    tag = "Profiles",
    operation_id = "getProfile",
    summary = "Get a voting profile",
    description = "Returns the profile linked to an identity. Callers may read their own profile; administrators may read any.",
    params(("user_id" = i32, Path, description = "Identity ID")),
    responses(
        (status = 200, description = "Profile", body = UserProfile),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Profile not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(caller = auth_user.user_id))]
pub async fn get_profile(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(user_id): Path<i32>,
) -> Result<AppJson<UserProfile>, AppError> {
    auth_user.require_self_or_admin(user_id)?;

    let profile = find_profile(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".into()))?;

    Ok(AppJson(UserProfile::from(profile)))
}
