use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use common::{NewTeam, Team};
use sea_orm::*;
use tracing::instrument;

use crate::entity::{team, vote};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::shared::normalize_optional_text;
use crate::models::team::validate_new_team;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Teams",
    operation_id = "listTeams",
    summary = "List teams by vote count",
    description = "Returns every team ordered by votes descending. Ties keep creation order.",
    responses(
        (status = 200, description = "Teams", body = Vec<Team>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn list_teams(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<AppJson<Vec<Team>>, AppError> {
    let teams = team::Entity::find()
        .order_by_desc(team::Column::Votes)
        .order_by_asc(team::Column::Id)
        .all(&state.db)
        .await?;

    Ok(AppJson(teams.into_iter().map(Team::from).collect()))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Teams",
    operation_id = "createTeam",
    summary = "Add a team",
    description = "Creates a team with zero votes. Requires administrator rights.",
    request_body = NewTeam,
    responses(
        (status = 201, description = "Team created", body = Team),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(team_name = %payload.team_name))]
pub async fn create_team(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewTeam>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_new_team(&payload)?;

    let new_team = team::ActiveModel {
        team_name: Set(payload.team_name.trim().to_string()),
        description: Set(normalize_optional_text(payload.description)),
        votes: Set(0),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = new_team.insert(&state.db).await?;

    tracing::info!(team_id = model.id, "Team created");
    Ok((StatusCode::CREATED, AppJson(Team::from(model))))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Teams",
    operation_id = "deleteTeam",
    summary = "Delete a team",
    description = "Removes the team together with the votes cast for it. Voters keep their has-voted flag. Requires administrator rights.",
    params(("id" = i32, Path, description = "Team ID")),
    responses(
        (status = 204, description = "Team deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Team not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(id))]
pub async fn delete_team(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;
    let _team = find_team_for_update(&txn, id).await?;

    let removed = vote::Entity::delete_many()
        .filter(vote::Column::TeamId.eq(id))
        .exec(&txn)
        .await?;
    team::Entity::delete_by_id(id).exec(&txn).await?;

    txn.commit().await?;
    tracing::info!(votes_removed = removed.rows_affected, "Team deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn find_team_for_update(
    txn: &DatabaseTransaction,
    id: i32,
) -> Result<team::Model, AppError> {
    use sea_orm::sea_query::LockType;
    team::Entity::find_by_id(id)
        .lock(LockType::Update)
        .one(txn)
        .await?
        .ok_or_else(|| AppError::NotFound("Team not found".into()))
}
