use anyhow::anyhow;
use sea_orm::prelude::Expr;
use sea_orm::*;
use tracing::info;

use crate::config::SeedConfig;
use crate::entity::{profile, user};
use crate::utils::account::provision_account;
use crate::utils::hash;

/// Ensure the configured administrator exists and holds admin rights.
///
/// Does nothing unless username, email, and password are all configured.
/// Safe to run on every startup.
pub async fn seed_admin(db: &DatabaseConnection, seed: &SeedConfig) -> anyhow::Result<()> {
    let (Some(username), Some(email), Some(password)) = (
        seed.admin_username.as_deref(),
        seed.admin_email.as_deref(),
        seed.admin_password.as_deref(),
    ) else {
        tracing::debug!("No administrator seed configured");
        return Ok(());
    };

    let existing = user::Entity::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await?;

    if let Some(existing) = existing {
        let res = profile::Entity::update_many()
            .col_expr(profile::Column::IsAdmin, Expr::value(true))
            .filter(profile::Column::UserId.eq(existing.id))
            .exec(db)
            .await?;
        info!(
            username,
            promoted = res.rows_affected,
            "Seed administrator already present"
        );
        return Ok(());
    }

    let hash = hash::hash_password(password)
        .map_err(|e| anyhow!("Failed to hash seed password: {}", e))?;

    let txn = db.begin().await?;
    let user = provision_account(&txn, username, &email.to_lowercase(), hash, true)
        .await
        .map_err(|e| anyhow!("Failed to create seed administrator: {:?}", e))?;
    txn.commit().await?;

    info!(user_id = user.id, username, "Seed administrator created");
    Ok(())
}
