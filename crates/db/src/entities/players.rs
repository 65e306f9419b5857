//! `SeaORM` Entity for players table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "players")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub player_id: String,
    pub points: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tournament_entries::Entity")]
    TournamentEntries,
}

impl Related<super::tournament_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TournamentEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
