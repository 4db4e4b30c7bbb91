//! Row mapping shared by the recipe adapters.

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::postgres::PgRow;
use sqlx::{PgExecutor, Row};
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, RecipeId, Timestamp, UserId};
use crate::domain::recipe::{
    Category, Difficulty, Ingredient, Instruction, RatingEntry, RatingLedger, Recipe,
    RecipeContent, Score,
};

/// Columns selected whenever a full recipe row is loaded.
pub(super) const RECIPE_COLUMNS: &str = "id, author_id, title, description, ingredients, \
     instructions, cooking_time, prep_time, servings, difficulty, category, cuisine, tags, \
     image, is_public, views, favorites, version, created_at, updated_at";

pub(super) fn db_error(context: &str) -> impl Fn(sqlx::Error) -> DomainError + '_ {
    move |e| DomainError::database(context, e)
}

fn decode_error(field: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to decode column '{}': {}", field, err),
    )
}

fn get<'r, T>(row: &'r PgRow, column: &str) -> Result<T, DomainError>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(column).map_err(|e| decode_error(column, e))
}

fn count(row: &PgRow, column: &str) -> Result<u32, DomainError> {
    let value: i32 = get(row, column)?;
    u32::try_from(value).map_err(|e| decode_error(column, e))
}

fn counter(row: &PgRow, column: &str) -> Result<u64, DomainError> {
    let value: i64 = get(row, column)?;
    u64::try_from(value).map_err(|e| decode_error(column, e))
}

fn json<T: serde::de::DeserializeOwned>(row: &PgRow, column: &str) -> Result<T, DomainError> {
    let value: JsonValue = get(row, column)?;
    serde_json::from_value(value).map_err(|e| decode_error(column, e))
}

/// Content as bindable JSON columns: (ingredients, instructions).
pub(super) fn content_json(content: &RecipeContent) -> Result<(JsonValue, JsonValue), DomainError> {
    let encode = |e: serde_json::Error| {
        DomainError::new(ErrorCode::InternalError, format!("Failed to encode recipe: {}", e))
    };
    Ok((
        serde_json::to_value(&content.ingredients).map_err(encode)?,
        serde_json::to_value(&content.instructions).map_err(encode)?,
    ))
}

pub(super) fn row_to_recipe(row: &PgRow, ratings: Vec<RatingEntry>) -> Result<Recipe, DomainError> {
    let id: Uuid = get(row, "id")?;
    let author: String = get(row, "author_id")?;
    let difficulty: String = get(row, "difficulty")?;
    let category: String = get(row, "category")?;
    let ingredients: Vec<Ingredient> = json(row, "ingredients")?;
    let instructions: Vec<Instruction> = json(row, "instructions")?;
    let created_at: DateTime<Utc> = get(row, "created_at")?;
    let updated_at: DateTime<Utc> = get(row, "updated_at")?;

    let content = RecipeContent {
        title: get(row, "title")?,
        description: get(row, "description")?,
        ingredients,
        instructions,
        cooking_time: count(row, "cooking_time")?,
        prep_time: count(row, "prep_time")?,
        servings: count(row, "servings")?,
        difficulty: difficulty
            .parse::<Difficulty>()
            .map_err(|e| decode_error("difficulty", e))?,
        category: category
            .parse::<Category>()
            .map_err(|e| decode_error("category", e))?,
        cuisine: get(row, "cuisine")?,
        tags: get(row, "tags")?,
        image: get(row, "image")?,
        is_public: get(row, "is_public")?,
    };

    Ok(Recipe::reconstitute(
        RecipeId::from_uuid(id),
        UserId::new(author).map_err(|e| decode_error("author_id", e))?,
        content,
        RatingLedger::from_entries(ratings),
        counter(row, "views")?,
        counter(row, "favorites")?,
        get(row, "version")?,
        Timestamp::from_datetime(created_at),
        Timestamp::from_datetime(updated_at),
    ))
}

fn row_to_rating(row: &PgRow) -> Result<RatingEntry, DomainError> {
    let user_id: String = get(row, "user_id")?;
    let rating: i16 = get(row, "rating")?;
    let created_at: DateTime<Utc> = get(row, "created_at")?;
    let updated_at: DateTime<Utc> = get(row, "updated_at")?;

    Ok(RatingEntry {
        user_id: UserId::new(user_id).map_err(|e| decode_error("user_id", e))?,
        score: Score::new(i64::from(rating)).map_err(|e| decode_error("rating", e))?,
        comment: get(row, "comment")?,
        created_at: Timestamp::from_datetime(created_at),
        updated_at: Timestamp::from_datetime(updated_at),
    })
}

/// Loads the rating ledgers of `ids`, each in ledger order.
pub(super) async fn load_ratings<'e, E>(
    executor: E,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, Vec<RatingEntry>>, DomainError>
where
    E: PgExecutor<'e>,
{
    let mut ledgers: HashMap<Uuid, Vec<RatingEntry>> = HashMap::new();
    if ids.is_empty() {
        return Ok(ledgers);
    }

    let rows = sqlx::query(
        r#"
        SELECT recipe_id, user_id, rating, comment, created_at, updated_at
        FROM recipe_ratings
        WHERE recipe_id = ANY($1)
        ORDER BY position
        "#,
    )
    .bind(ids)
    .fetch_all(executor)
    .await
    .map_err(db_error("Failed to fetch ratings"))?;

    for row in &rows {
        let recipe_id: Uuid = get(row, "recipe_id")?;
        ledgers.entry(recipe_id).or_default().push(row_to_rating(row)?);
    }
    Ok(ledgers)
}

/// Maps recipe rows to aggregates, attaching their ledgers in row order.
pub(super) async fn rows_to_recipes<'e, E>(
    executor: E,
    rows: Vec<PgRow>,
) -> Result<Vec<Recipe>, DomainError>
where
    E: PgExecutor<'e>,
{
    let ids = rows
        .iter()
        .map(|row| get::<Uuid>(row, "id"))
        .collect::<Result<Vec<_>, _>>()?;
    let mut ledgers = load_ratings(executor, &ids).await?;

    rows.iter()
        .zip(ids)
        .map(|(row, id)| row_to_recipe(row, ledgers.remove(&id).unwrap_or_default()))
        .collect()
}
