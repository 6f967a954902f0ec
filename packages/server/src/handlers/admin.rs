use axum::extract::State;
use common::{Team, VoteStats};
use sea_orm::*;
use tracing::instrument;

use crate::entity::team;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Admin",
    operation_id = "getVoteStats",
    summary = "Aggregate voting statistics",
    description = "Team count, total votes, and the highest single-team count. Requires administrator rights.",
    responses(
        (status = 200, description = "Statistics", body = VoteStats),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn get_stats(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<AppJson<VoteStats>, AppError> {
    auth_user.require_admin()?;

    let teams: Vec<Team> = team::Entity::find()
        .all(&state.db)
        .await?
        .into_iter()
        .map(Team::from)
        .collect();

    Ok(AppJson(VoteStats::from_teams(&teams)))
}
