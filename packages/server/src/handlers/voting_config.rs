use axum::{extract::State, http::StatusCode, response::IntoResponse};
use common::{NewVotingConfig, VotingConfig};
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::instrument;

use crate::entity::voting_config;
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::voting_config::validate_new_voting_config;
use crate::state::AppState;

/// Latest configuration flagged active, if any.
pub(crate) async fn find_active_config<C: ConnectionTrait>(
    db: &C,
) -> Result<Option<voting_config::Model>, DbErr> {
    voting_config::Entity::find()
        .filter(voting_config::Column::IsActive.eq(true))
        .order_by_desc(voting_config::Column::Id)
        .one(db)
        .await
}

#[utoipa::path(
    get,
    path = "/active",
    tag = "Voting Config",
    operation_id = "getActiveVotingConfig",
    summary = "Get the active voting window",
    responses(
        (status = 200, description = "Active window", body = VotingConfig),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No active window (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, _auth_user))]
pub async fn get_active_config(
    _auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<AppJson<VotingConfig>, AppError> {
    let config = find_active_config(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("No active voting configuration".into()))?;

    Ok(AppJson(VotingConfig::from(config)))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Voting Config",
    operation_id = "openVotingWindow",
    summary = "Open a new voting window",
    description = "Stores a window and makes it the only active one. Requires administrator rights.",
    request_body = NewVotingConfig,
    responses(
        (status = 201, description = "Window stored and activated", body = VotingConfig),
        (status = 400, description = "End before start (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn create_voting_config(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<NewVotingConfig>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_new_voting_config(&payload)?;

    let txn = state.db.begin().await?;
    deactivate_all(&txn).await?;

    let new_config = voting_config::ActiveModel {
        start_time: Set(payload.start_time),
        end_time: Set(payload.end_time),
        is_active: Set(true),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = new_config.insert(&txn).await?;
    txn.commit().await?;

    tracing::info!(config_id = model.id, start = %model.start_time, end = %model.end_time, "Voting window opened");
    Ok((StatusCode::CREATED, AppJson(VotingConfig::from(model))))
}

#[utoipa::path(
    post,
    path = "/close",
    tag = "Voting Config",
    operation_id = "closeVotingWindow",
    summary = "Close the active voting window",
    description = "Ends the active window now. The window stays the active config so results remain \
                   available. A window that already ended is left unchanged. Requires administrator rights.",
    responses(
        (status = 200, description = "Window closed", body = VotingConfig),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "No active window (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn close_voting_config(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<AppJson<VotingConfig>, AppError> {
    use sea_orm::sea_query::LockType;
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;
    let current = voting_config::Entity::find()
        .filter(voting_config::Column::IsActive.eq(true))
        .order_by_desc(voting_config::Column::Id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::NotFound("No active voting configuration".into()))?;

    let closed = VotingConfig::from(current.clone()).closed_at(chrono::Utc::now());
    let mut active: voting_config::ActiveModel = current.into();
    active.start_time = Set(closed.start_time);
    active.end_time = Set(closed.end_time);
    let model = active.update(&txn).await?;
    txn.commit().await?;

    tracing::info!(config_id = model.id, end = %model.end_time, "Voting window closed");
    Ok(AppJson(VotingConfig::from(model)))
}

async fn deactivate_all<C: ConnectionTrait>(db: &C) -> Result<u64, DbErr> {
    let res = voting_config::Entity::update_many()
        .col_expr(voting_config::Column::IsActive, Expr::value(false))
        .filter(voting_config::Column::IsActive.eq(true))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}
