//! PostgreSQL implementation of UserRepository.
//!
//! Favorite sets live in `user_favorites` (PK user_id, recipe_id) and the
//! created-recipe counter in `user_stats`.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::warn;

use super::rows::db_error;
use crate::domain::foundation::{DomainError, RecipeId, UserId};
use crate::ports::{FavoriteToggle, UserRepository};

/// PostgreSQL implementation of UserRepository.
#[derive(Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new PostgresUserRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn toggle_favorite(
        &self,
        user_id: &UserId,
        recipe_id: &RecipeId,
    ) -> Result<FavoriteToggle, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let exists: Option<i32> =
            sqlx::query_scalar("SELECT 1 FROM recipes WHERE id = $1 FOR UPDATE")
                .bind(recipe_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("Failed to lock recipe"))?;
        if exists.is_none() {
            return Err(DomainError::recipe_not_found(recipe_id));
        }

        // The membership decision is the outcome of the conditional write
        // itself, never a prior read.
        let removed =
            sqlx::query("DELETE FROM user_favorites WHERE user_id = $1 AND recipe_id = $2")
                .bind(user_id.as_str())
                .bind(recipe_id.as_uuid())
                .execute(&mut *tx)
                .await
                .map_err(db_error("Failed to remove favorite"))?
                .rows_affected();

        let favorited = if removed == 1 {
            false
        } else {
            let inserted = sqlx::query(
                r#"
                INSERT INTO user_favorites (user_id, recipe_id, created_at)
                VALUES ($1, $2, NOW())
                ON CONFLICT (user_id, recipe_id) DO NOTHING
                "#,
            )
            .bind(user_id.as_str())
            .bind(recipe_id.as_uuid())
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to add favorite"))?
            .rows_affected();

            if inserted == 0 {
                warn!(user_id = %user_id, recipe_id = %recipe_id, "Favorite toggle lost a race");
                return Err(DomainError::conflict(format!(
                    "Favorite for recipe {} changed concurrently",
                    recipe_id
                )));
            }
            true
        };

        let delta: i64 = if favorited { 1 } else { -1 };
        let count: i64 = sqlx::query_scalar(
            r#"
            UPDATE recipes SET favorites = GREATEST(favorites + $2, 0)
            WHERE id = $1
            RETURNING favorites
            "#,
        )
        .bind(recipe_id.as_uuid())
        .bind(delta)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("Failed to adjust favorite counter"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit transaction"))?;

        Ok(FavoriteToggle {
            favorited,
            favorites_count: count.max(0) as u64,
        })
    }

    async fn purge_favorites(&self, recipe_id: &RecipeId) -> Result<u64, DomainError> {
        let result = sqlx::query("DELETE FROM user_favorites WHERE recipe_id = $1")
            .bind(recipe_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to purge favorites"))?;

        Ok(result.rows_affected())
    }

    async fn adjust_recipe_count(&self, user_id: &UserId, delta: i64) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO user_stats (user_id, recipes_created)
            VALUES ($1, GREATEST($2, 0))
            ON CONFLICT (user_id) DO UPDATE
                SET recipes_created = GREATEST(user_stats.recipes_created + $2, 0)
            RETURNING recipes_created
            "#,
        )
        .bind(user_id.as_str())
        .bind(delta)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to adjust recipe count"))?;

        Ok(count.max(0) as u64)
    }
}
