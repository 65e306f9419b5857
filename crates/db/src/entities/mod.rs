//! `SeaORM` entity definitions.

pub mod players;
pub mod sea_orm_active_enums;
pub mod tournament_entries;
pub mod tournaments;
