//! Player repository for balance rows.

use std::collections::HashMap;

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};

use super::error::{RepositoryError, is_unique_violation};
use crate::entities::players;

/// Player repository for CRUD operations on balances.
#[derive(Debug, Clone)]
pub struct PlayerRepository {
    db: DatabaseConnection,
}

impl PlayerRepository {
    /// Creates a new player repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a player with an opening balance.
    ///
    /// # Errors
    ///
    /// Returns `PlayerExists` if the id is taken.
    pub async fn create(
        &self,
        player_id: &str,
        points: i64,
    ) -> Result<players::Model, RepositoryError> {
        let now = chrono::Utc::now();
        let player = players::ActiveModel {
            player_id: Set(player_id.to_string()),
            points: Set(points),
            created_at: Set(now),
            updated_at: Set(now),
        };

        player.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                RepositoryError::PlayerExists(player_id.to_string())
            } else {
                e.into()
            }
        })
    }

    /// Finds a player by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        player_id: &str,
    ) -> Result<Option<players::Model>, RepositoryError> {
        Ok(players::Entity::find_by_id(player_id.to_string())
            .one(&self.db)
            .await?)
    }

    /// Reads the balances of every listed player that exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_points(
        &self,
        player_ids: &[String],
    ) -> Result<HashMap<String, i64>, RepositoryError> {
        if player_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = players::Entity::find()
            .filter(players::Column::PlayerId.is_in(player_ids.iter().cloned()))
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(|p| (p.player_id, p.points)).collect())
    }

    /// Overwrites a balance.
    ///
    /// # Errors
    ///
    /// Returns `PlayerNotFound` if no row was updated.
    pub async fn update_points(&self, player_id: &str, points: i64) -> Result<(), RepositoryError> {
        set_points(&self.db, player_id, points).await
    }
}

/// Overwrites a balance on any connection, transactions included.
pub(crate) async fn set_points<C: ConnectionTrait>(
    db: &C,
    player_id: &str,
    points: i64,
) -> Result<(), RepositoryError> {
    let result = players::Entity::update_many()
        .col_expr(players::Column::Points, Expr::value(points))
        .col_expr(players::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(players::Column::PlayerId.eq(player_id))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        return Err(RepositoryError::PlayerNotFound(player_id.to_string()));
    }
    Ok(())
}
