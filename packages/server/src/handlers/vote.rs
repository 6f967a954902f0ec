use axum::{extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use common::{CastVoteRequest, Vote, VotingConfig};
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::instrument;

use super::team::find_team_for_update;
use super::voting_config::find_active_config;
use crate::entity::{profile, team, vote};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/",
    tag = "Votes",
    operation_id = "castVote",
    summary = "Cast a vote",
    description = "Records one vote for the caller, increments the team's count, and marks the caller's profile as having voted, all in one transaction. \
                   `user_id` must match the bearer token. Rejected outside the active voting window.",
    request_body = CastVoteRequest,
    responses(
        (status = 201, description = "Vote recorded", body = Vote),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not the caller's ballot or window closed (PERMISSION_DENIED, VOTING_CLOSED)", body = ErrorBody),
        (status = 404, description = "Team not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Caller already voted (ALREADY_VOTED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, team_id = payload.team_id))]
pub async fn cast_vote(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CastVoteRequest>,
) -> Result<impl IntoResponse, AppError> {
    if payload.user_id != auth_user.user_id {
        return Err(AppError::PermissionDenied);
    }

    let now = Utc::now();
    let txn = state.db.begin().await?;

    let window = find_active_config(&txn).await?.map(VotingConfig::from);
    if !window.is_some_and(|w| w.accepts_votes_at(now)) {
        return Err(AppError::VotingClosed);
    }

    let team = find_team_for_update(&txn, payload.team_id).await?;

    let ballot = vote::ActiveModel {
        user_id: Set(auth_user.user_id),
        team_id: Set(team.id),
        created_at: Set(now),
        ..Default::default()
    };
    let ballot = ballot.insert(&txn).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::AlreadyVoted,
        _ => AppError::from(e),
    })?;

    let votes = team.votes + 1;
    let mut active: team::ActiveModel = team.into();
    active.votes = Set(votes);
    active.update(&txn).await?;

    profile::Entity::update_many()
        .col_expr(profile::Column::HasVoted, Expr::value(true))
        .filter(profile::Column::UserId.eq(auth_user.user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(votes, "Vote recorded");
    Ok((StatusCode::CREATED, AppJson(Vote::from(ballot))))
}
