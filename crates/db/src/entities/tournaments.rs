//! `SeaORM` Entity for tournaments table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::TournamentStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tournaments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tour_id: i64,
    pub deposit: i64,
    pub status: TournamentStatus,
    pub winner_id: Option<String>,
    pub prize: Option<i64>,
    pub created_at: DateTimeUtc,
    pub settled_at: Option<DateTimeUtc>,
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
