//! Initial schema: players, tournaments and the join table between them.
//!
//! Built with the schema builder so the same migration runs on `SQLite` and
//! `PostgreSQL`.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Players::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Players::PlayerId).string().not_null().primary_key())
                    .col(ColumnDef::new(Players::Points).big_integer().not_null())
                    .col(
                        ColumnDef::new(Players::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Players::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Tournaments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Tournaments::TourId)
                            .big_integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Tournaments::Deposit).big_integer().not_null())
                    .col(ColumnDef::new(Tournaments::Status).string_len(16).not_null())
                    .col(ColumnDef::new(Tournaments::WinnerId).string().null())
                    .col(ColumnDef::new(Tournaments::Prize).big_integer().null())
                    .col(
                        ColumnDef::new(Tournaments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tournaments::SettledAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TournamentEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TournamentEntries::TourId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TournamentEntries::PlayerId).string().not_null())
                    .col(ColumnDef::new(TournamentEntries::Position).integer().not_null())
                    .primary_key(
                        Index::create()
                            .col(TournamentEntries::TourId)
                            .col(TournamentEntries::PlayerId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tournament_entries_tournament")
                            .from(TournamentEntries::Table, TournamentEntries::TourId)
                            .to(Tournaments::Table, Tournaments::TourId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tournament_entries_player")
                            .from(TournamentEntries::Table, TournamentEntries::PlayerId)
                            .to(Players::Table, Players::PlayerId)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Settlement reads entries in join order
        manager
            .create_index(
                Index::create()
                    .name("idx_tournament_entries_position")
                    .table(TournamentEntries::Table)
                    .col(TournamentEntries::TourId)
                    .col(TournamentEntries::Position)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TournamentEntries::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tournaments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Players::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Players {
    Table,
    PlayerId,
    Points,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Tournaments {
    Table,
    TourId,
    Deposit,
    Status,
    WinnerId,
    Prize,
    CreatedAt,
    SettledAt,
}

#[derive(DeriveIden)]
enum TournamentEntries {
    Table,
    TourId,
    PlayerId,
    Position,
}
