use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub team_name: String,
    #[sea_orm(column_type = "Text")]
    pub description: Option<String>,

    /// Aggregate maintained by the vote transaction.
    #[sea_orm(default_value = 0, indexed)]
    pub votes: i32,

    #[sea_orm(has_many)]
    pub ballots: HasMany<super::vote::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
