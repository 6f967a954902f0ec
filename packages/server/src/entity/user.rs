use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Login identity. Voting state lives on the linked profile.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password: String,

    #[sea_orm(has_one)]
    pub profile: HasOne<super::profile::Entity>,

    #[sea_orm(has_one)]
    pub vote: HasOne<super::vote::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
