//! PostgreSQL implementation of RecipeRepository.
//!
//! Persists Recipe aggregates to the `recipes` table and their ledgers to
//! `recipe_ratings` (UNIQUE on recipe_id, user_id).

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, info};

use super::rows::{content_json, db_error, load_ratings, row_to_recipe, RECIPE_COLUMNS};
use crate::domain::foundation::{DomainError, RecipeId, Timestamp, UserId};
use crate::domain::recipe::{
    search_text, IndexKind, IndexSpec, LedgerChange, RatingSubmission, Recipe,
};
use crate::ports::RecipeRepository;

/// PostgreSQL implementation of RecipeRepository.
#[derive(Clone)]
pub struct PostgresRecipeRepository {
    pool: PgPool,
}

impl PostgresRecipeRepository {
    /// Creates a new PostgresRecipeRepository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipeRepository for PostgresRecipeRepository {
    async fn insert(&self, recipe: &Recipe) -> Result<(), DomainError> {
        let content = recipe.content();
        let (ingredients, instructions) = content_json(content)?;

        sqlx::query(
            r#"
            INSERT INTO recipes (
                id, author_id, title, description, ingredients, instructions,
                cooking_time, prep_time, servings, difficulty, category, cuisine,
                tags, image, is_public, search_text, average_rating, total_ratings,
                views, favorites, version, created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12,
                $13, $14, $15, $16, $17, $18, $19, $20, $21, $22, $23
            )
            "#,
        )
        .bind(recipe.id().as_uuid())
        .bind(recipe.author().as_str())
        .bind(&content.title)
        .bind(&content.description)
        .bind(ingredients)
        .bind(instructions)
        .bind(content.cooking_time as i32)
        .bind(content.prep_time as i32)
        .bind(content.servings as i32)
        .bind(content.difficulty.as_str())
        .bind(content.category.as_str())
        .bind(&content.cuisine)
        .bind(&content.tags)
        .bind(content.image.as_deref())
        .bind(content.is_public)
        .bind(search_text(content))
        .bind(recipe.average_rating())
        .bind(recipe.total_ratings() as i32)
        .bind(recipe.views() as i64)
        .bind(recipe.favorites() as i64)
        .bind(recipe.version())
        .bind(recipe.created_at().as_datetime())
        .bind(recipe.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to insert recipe"))?;

        Ok(())
    }

    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM recipes WHERE id = $1", RECIPE_COLUMNS))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to fetch recipe"))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut ledgers = load_ratings(&self.pool, &[*id.as_uuid()]).await?;
        let ratings = ledgers.remove(id.as_uuid()).unwrap_or_default();
        row_to_recipe(&row, ratings).map(Some)
    }

    async fn update(&self, recipe: &Recipe, expected_version: i64) -> Result<(), DomainError> {
        let content = recipe.content();
        let (ingredients, instructions) = content_json(content)?;

        let result = sqlx::query(
            r#"
            UPDATE recipes SET
                title = $3,
                description = $4,
                ingredients = $5,
                instructions = $6,
                cooking_time = $7,
                prep_time = $8,
                servings = $9,
                difficulty = $10,
                category = $11,
                cuisine = $12,
                tags = $13,
                image = $14,
                is_public = $15,
                search_text = $16,
                version = $17,
                updated_at = $18
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(recipe.id().as_uuid())
        .bind(expected_version)
        .bind(&content.title)
        .bind(&content.description)
        .bind(ingredients)
        .bind(instructions)
        .bind(content.cooking_time as i32)
        .bind(content.prep_time as i32)
        .bind(content.servings as i32)
        .bind(content.difficulty.as_str())
        .bind(content.category.as_str())
        .bind(&content.cuisine)
        .bind(&content.tags)
        .bind(content.image.as_deref())
        .bind(content.is_public)
        .bind(search_text(content))
        .bind(recipe.version())
        .bind(recipe.updated_at().as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update recipe"))?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        let current: Option<i64> = sqlx::query_scalar("SELECT version FROM recipes WHERE id = $1")
            .bind(recipe.id().as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to check recipe version"))?;

        match current {
            None => Err(DomainError::recipe_not_found(recipe.id())),
            Some(actual) => Err(DomainError::conflict(format!(
                "Recipe {} was modified concurrently",
                recipe.id()
            ))
            .with_detail("expected_version", expected_version.to_string())
            .with_detail("actual_version", actual.to_string())),
        }
    }

    async fn delete(&self, id: &RecipeId) -> Result<bool, DomainError> {
        // recipe_ratings and user_favorites cascade on the foreign key
        let result = sqlx::query("DELETE FROM recipes WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete recipe"))?;

        Ok(result.rows_affected() > 0)
    }

    async fn record_view(&self, id: &RecipeId) -> Result<Option<Recipe>, DomainError> {
        let row = sqlx::query(&format!(
            "UPDATE recipes SET views = views + 1 WHERE id = $1 RETURNING {}",
            RECIPE_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to record recipe view"))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut ledgers = load_ratings(&self.pool, &[*id.as_uuid()]).await?;
        let ratings = ledgers.remove(id.as_uuid()).unwrap_or_default();
        row_to_recipe(&row, ratings).map(Some)
    }

    async fn submit_rating(
        &self,
        id: &RecipeId,
        user_id: &UserId,
        submission: &RatingSubmission,
    ) -> Result<Option<Recipe>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        // Row lock serializes concurrent raters of the same recipe, so the
        // recalculated summary always covers every committed entry.
        let row = sqlx::query(&format!(
            "SELECT {} FROM recipes WHERE id = $1 FOR UPDATE",
            RECIPE_COLUMNS
        ))
        .bind(id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to lock recipe"))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let mut ledgers = load_ratings(&mut *tx, &[*id.as_uuid()]).await?;
        let mut recipe = row_to_recipe(&row, ledgers.remove(id.as_uuid()).unwrap_or_default())?;

        let now = Timestamp::now();
        let change = recipe.submit_rating(user_id, submission, now);

        sqlx::query(
            r#"
            INSERT INTO recipe_ratings (recipe_id, user_id, rating, comment, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $5)
            ON CONFLICT (recipe_id, user_id) DO UPDATE SET
                rating = EXCLUDED.rating,
                comment = EXCLUDED.comment,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(id.as_uuid())
        .bind(user_id.as_str())
        .bind(i16::from(submission.score().value()))
        .bind(submission.comment())
        .bind(now.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to upsert rating"))?;

        sqlx::query(
            r#"
            UPDATE recipes SET average_rating = $2, total_ratings = $3, updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(recipe.average_rating())
        .bind(recipe.total_ratings() as i32)
        .bind(now.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to store rating summary"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit transaction"))?;

        debug!(
            recipe_id = %id,
            replaced = matches!(change, LedgerChange::Replaced { .. }),
            average = recipe.average_rating(),
            "Rating stored"
        );
        Ok(Some(recipe))
    }

    async fn ensure_indexes(&self, indexes: &[IndexSpec]) -> Result<(), DomainError> {
        for index in indexes {
            sqlx::query(&create_index_sql(index))
                .execute(&self.pool)
                .await
                .map_err(db_error("Failed to ensure index"))?;
            info!(index = index.name, "Index ensured");
        }
        Ok(())
    }
}

/// Renders the idempotent DDL for one catalog entry.
fn create_index_sql(index: &IndexSpec) -> String {
    let columns = index
        .columns
        .iter()
        .map(|c| {
            if c.descending {
                format!("{} DESC", c.name)
            } else {
                c.name.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ");

    match index.kind {
        IndexKind::FullText => format!(
            "CREATE INDEX IF NOT EXISTS {} ON recipes USING GIN ({})",
            index.name, columns
        ),
        IndexKind::BTree => format!(
            "CREATE INDEX IF NOT EXISTS {} ON recipes ({})",
            index.name, columns
        ),
    }
}
