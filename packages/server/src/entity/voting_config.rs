use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "voting_config")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub start_time: DateTimeUtc,
    pub end_time: DateTimeUtc,

    /// At most one row is active; enforced by the create transaction.
    #[sea_orm(default_value = false, indexed)]
    pub is_active: bool,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
