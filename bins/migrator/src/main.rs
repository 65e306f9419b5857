//! Database migration runner for the back-a-friend ledger.
//!
//! Usage:
//!   migrator up      - Run all pending migrations
//!   migrator down    - Rollback last migration
//!   migrator status  - Show migration status
//!   migrator fresh   - Drop all tables and re-run migrations
//!
//! The database settings come from the same `AppConfig` the server loads
//! (`config/*` files and `BACKER__DATABASE__*`). `-u` overrides the URL.

use clap::{Parser, Subcommand};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseConnection;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use backer_db::{connect, migration::Migrator};
use backer_shared::AppConfig;
use backer_shared::config::DatabaseConfig;

#[derive(Debug, Parser)]
#[command(name = "migrator", version, about = "Back-a-friend schema migrations")]
struct Args {
    /// Database URL; defaults to the configured `database.url`.
    #[arg(short = 'u', long)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
enum Command {
    /// Run all pending migrations.
    Up,
    /// Rollback the last migration.
    Down,
    /// Show migration status.
    Status,
    /// Drop all tables and re-run every migration.
    Fresh,
}

fn database_config(url_override: Option<String>, config: AppConfig) -> DatabaseConfig {
    let mut database = config.database;
    if let Some(url) = url_override {
        database.url = url;
    }
    database
}

async fn run(command: Command, db: &DatabaseConnection) -> Result<(), DbErr> {
    match command {
        Command::Up => Migrator::up(db, None).await,
        Command::Down => Migrator::down(db, Some(1)).await,
        Command::Status => Migrator::status(db).await,
        Command::Fresh => Migrator::fresh(db).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "backer=info,sea_orm_migration=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let command = args.command.unwrap_or(Command::Up);
    let database = database_config(args.database_url, AppConfig::load()?);

    let db = connect(&database).await?;
    info!(url = %database.url, ?command, "Running migrations");
    run(command, &db).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.database.url = "sqlite::memory:".to_string();
        config.database.max_connections = 1;
        config.database.min_connections = 1;
        config
    }

    #[test]
    fn test_args_default_to_configured_url() {
        let args = Args::try_parse_from(["migrator"]).unwrap();
        assert_eq!(args.command, None);

        let database = database_config(args.database_url, memory_config());
        assert_eq!(database.url, "sqlite::memory:");
        assert_eq!(database.max_connections, 1);
    }

    #[test]
    fn test_url_flag_overrides_config() {
        let args =
            Args::try_parse_from(["migrator", "-u", "sqlite://other.db?mode=rwc", "down"]).unwrap();
        assert_eq!(args.command, Some(Command::Down));

        let database = database_config(args.database_url, memory_config());
        assert_eq!(database.url, "sqlite://other.db?mode=rwc");
    }

    #[test]
    fn test_unknown_subcommand_is_rejected() {
        assert!(Args::try_parse_from(["migrator", "sideways"]).is_err());
    }

    #[tokio::test]
    async fn test_up_then_down() {
        let database = database_config(None, memory_config());
        let db = connect(&database).await.unwrap();

        run(Command::Up, &db).await.unwrap();
        assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());

        run(Command::Status, &db).await.unwrap();

        run(Command::Down, &db).await.unwrap();
        assert_eq!(Migrator::get_pending_migrations(&db).await.unwrap().len(), 1);
    }
}
