//! PostgreSQL implementation of RecipeReader.
//!
//! Renders a compiled `QueryPlan` into SQL with `QueryBuilder`. Every
//! user-supplied value is bound; only column names from closed enums are
//! interpolated.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::debug;

use super::rows::{db_error, rows_to_recipes, RECIPE_COLUMNS};
use crate::domain::foundation::{DomainError, UserId};
use crate::domain::recipe::{
    PageRequest, QueryPlan, RecipeFilter, RecipePage, SortDirection, SortField, SortKey,
    TextSearch,
};
use crate::ports::RecipeReader;

/// Text search configuration used by the generated `search_document`.
const TEXT_SEARCH_CONFIG: &str = "english";

/// PostgreSQL implementation of RecipeReader.
#[derive(Clone)]
pub struct PostgresRecipeReader {
    pool: PgPool,
}

impl PostgresRecipeReader {
    /// Creates a new PostgresRecipeReader.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecipeReader for PostgresRecipeReader {
    async fn find_page(&self, plan: &QueryPlan) -> Result<RecipePage, DomainError> {
        debug!(access_path = ?plan.access_path, sort = ?plan.sort, "Evaluating listing plan");

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM recipes");
        push_filter(&mut count, &plan.filter);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count recipes"))?;

        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {} FROM recipes", RECIPE_COLUMNS));
        push_filter(&mut select, &plan.filter);
        push_order(&mut select, plan);
        push_window(&mut select, plan.page);
        let rows = select
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list recipes"))?;

        let records = rows_to_recipes(&self.pool, rows).await?;
        Ok(RecipePage::new(records, plan.page, total.max(0) as u64))
    }

    async fn find_favorites(
        &self,
        user_id: &UserId,
        page: PageRequest,
    ) -> Result<RecipePage, DomainError> {
        const FAVORITES: &str = " FROM recipes r \
             JOIN user_favorites f ON f.recipe_id = r.id \
             WHERE f.user_id = ";

        let mut count = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*){}", FAVORITES));
        count.push_bind(user_id.as_str());
        count.push(" AND (r.is_public OR r.author_id = ");
        count.push_bind(user_id.as_str());
        count.push(")");
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count favorites"))?;

        let columns = RECIPE_COLUMNS
            .split(", ")
            .map(|c| format!("r.{}", c.trim()))
            .collect::<Vec<_>>()
            .join(", ");
        let mut select =
            QueryBuilder::<Postgres>::new(format!("SELECT {}{}", columns, FAVORITES));
        select.push_bind(user_id.as_str());
        select.push(" AND (r.is_public OR r.author_id = ");
        select.push_bind(user_id.as_str());
        select.push(") ORDER BY r.created_at DESC, r.id ASC");
        push_window(&mut select, page);
        let rows = select
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list favorites"))?;

        let records = rows_to_recipes(&self.pool, rows).await?;
        Ok(RecipePage::new(records, page, total.max(0) as u64))
    }
}

fn push_filter(qb: &mut QueryBuilder<'_, Postgres>, filter: &RecipeFilter) {
    qb.push(" WHERE TRUE");
    if filter.public_only {
        qb.push(" AND is_public");
    }
    if let Some(author) = &filter.author {
        qb.push(" AND author_id = ").push_bind(author.as_str().to_string());
    }
    if let Some(category) = filter.category {
        qb.push(" AND category = ").push_bind(category.as_str());
    }
    if let Some(difficulty) = filter.difficulty {
        qb.push(" AND difficulty = ").push_bind(difficulty.as_str());
    }
    if let Some(needle) = &filter.cuisine {
        // Literal substring: strpos does not interpret pattern characters.
        qb.push(" AND strpos(lower(cuisine), ")
            .push_bind(needle.clone())
            .push(") > 0");
    }
    if let Some(min) = filter.min_rating {
        qb.push(" AND average_rating >= ").push_bind(min);
    }
    if let Some(text) = &filter.text {
        qb.push(" AND search_document @@ ");
        push_tsquery(qb, text);
    }
}

fn push_tsquery(qb: &mut QueryBuilder<'_, Postgres>, text: &TextSearch) {
    qb.push(format!("to_tsquery('{}', ", TEXT_SEARCH_CONFIG))
        .push_bind(tsquery(text))
        .push(")");
}

/// Any-term query; terms are alphanumeric so need no escaping.
fn tsquery(text: &TextSearch) -> String {
    text.terms().join(" | ")
}

fn push_order(qb: &mut QueryBuilder<'_, Postgres>, plan: &QueryPlan) {
    qb.push(" ORDER BY ");
    match (plan.sort, &plan.filter.text) {
        (SortKey::Relevance, Some(text)) => {
            qb.push("ts_rank(search_document, ");
            push_tsquery(qb, text);
            qb.push(") DESC, ");
        }
        (SortKey::Relevance, None) => {}
        (SortKey::Field(SortField::CreatedAt, direction), _) => {
            qb.push(format!("created_at {}, id ASC", direction_sql(direction)));
            return;
        }
        (SortKey::Field(field, direction), _) => {
            qb.push(format!("{} {}, ", sort_column(field), direction_sql(direction)));
        }
    }
    qb.push("created_at DESC, id ASC");
}

fn push_window(qb: &mut QueryBuilder<'_, Postgres>, page: PageRequest) {
    qb.push(" LIMIT ")
        .push_bind(i64::from(page.limit))
        .push(" OFFSET ")
        .push_bind(page.offset() as i64);
}

fn sort_column(field: SortField) -> &'static str {
    match field {
        SortField::CreatedAt => "created_at",
        SortField::UpdatedAt => "updated_at",
        SortField::AverageRating => "average_rating",
        SortField::TotalRatings => "total_ratings",
        SortField::Views => "views",
        SortField::Favorites => "favorites",
        SortField::Title => "title",
        SortField::CookingTime => "cooking_time",
        SortField::PrepTime => "prep_time",
    }
}

fn direction_sql(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => "ASC",
        SortDirection::Desc => "DESC",
    }
}
