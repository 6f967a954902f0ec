use chrono::Utc;
use sea_orm::*;

use crate::entity::{profile, user};
use crate::error::AppError;

/// Insert a user and its voting profile. Callers run this inside a transaction
/// so an identity never exists without a profile.
pub async fn provision_account<C: ConnectionTrait>(
    db: &C,
    username: &str,
    email: &str,
    password_hash: String,
    is_admin: bool,
) -> Result<user::Model, AppError> {
    let username_taken = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?
        .is_some();
    if username_taken {
        return Err(AppError::UsernameTaken);
    }

    let email_taken = user::Entity::find()
        .filter(user::Column::Email.eq(email))
        .one(db)
        .await?
        .is_some();
    if email_taken {
        return Err(AppError::EmailTaken);
    }

    let now = Utc::now();
    let new_user = user::ActiveModel {
        username: Set(username.to_string()),
        email: Set(email.to_string()),
        password: Set(password_hash),
        created_at: Set(now),
        ..Default::default()
    };

    let user = new_user.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            tracing::debug!("Registration race condition: unique constraint caught on insert");
            if detail.contains("email") {
                AppError::EmailTaken
            } else {
                AppError::UsernameTaken
            }
        }
        _ => AppError::from(e),
    })?;

    let new_profile = profile::ActiveModel {
        user_id: Set(user.id),
        username: Set(user.username.clone()),
        email: Set(user.email.clone()),
        has_voted: Set(false),
        is_admin: Set(is_admin),
        created_at: Set(now),
        ..Default::default()
    };
    new_profile.insert(db).await?;

    Ok(user)
}

/// Look up the profile linked to an identity.
pub async fn find_profile<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
) -> Result<Option<profile::Model>, DbErr> {
    profile::Entity::find()
        .filter(profile::Column::UserId.eq(user_id))
        .one(db)
        .await
}
