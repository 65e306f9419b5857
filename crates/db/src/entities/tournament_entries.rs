//! `SeaORM` Entity for tournament_entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "tournament_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub tour_id: i64,
    #[sea_orm(primary_key, auto_increment = false)]
    pub player_id: String,
    /// Zero-based join order within the tournament.
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::tournaments::Entity",
        from = "Column::TourId",
        to = "super::tournaments::Column::TourId"
    )]
    Tournaments,
    #[sea_orm(
        belongs_to = "super::players::Entity",
        from = "Column::PlayerId",
        to = "super::players::Column::PlayerId"
    )]
    Players,
}

impl Related<super::tournaments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tournaments.def()
    }
}

impl Related<super::players::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Players.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
