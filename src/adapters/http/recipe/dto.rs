//! HTTP DTOs for recipe endpoints.
//!
//! Wire names are camelCase. Request bodies ignore unknown keys, so a client
//! sending derived fields (`averageRating`, `views`, ...) cannot set them.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::ValidationError;
use crate::domain::recipe::{
    Ingredient, IngredientInput, Instruction, InstructionInput, RatingEntry, Recipe, RecipeDraft,
    RecipePage, RecipePatch,
};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of create and update requests.
///
/// Create treats it as a full draft, update as a patch.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecipeRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub ingredients: Option<Vec<IngredientInput>>,
    pub instructions: Option<Vec<InstructionInput>>,
    pub cooking_time: Option<i64>,
    pub prep_time: Option<i64>,
    pub servings: Option<i64>,
    pub difficulty: Option<String>,
    pub category: Option<String>,
    pub cuisine: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image: Option<String>,
    pub is_public: Option<bool>,
}

impl From<RecipeRequest> for RecipeDraft {
    fn from(req: RecipeRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            ingredients: req.ingredients,
            instructions: req.instructions,
            cooking_time: req.cooking_time,
            prep_time: req.prep_time,
            servings: req.servings,
            difficulty: req.difficulty,
            category: req.category,
            cuisine: req.cuisine,
            tags: req.tags,
            image: req.image,
            is_public: req.is_public,
        }
    }
}

impl From<RecipeRequest> for RecipePatch {
    fn from(req: RecipeRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            ingredients: req.ingredients,
            instructions: req.instructions,
            cooking_time: req.cooking_time,
            prep_time: req.prep_time,
            servings: req.servings,
            difficulty: req.difficulty,
            category: req.category,
            cuisine: req.cuisine,
            tags: req.tags,
            image: req.image,
            is_public: req.is_public,
        }
    }
}

/// Body of a rating request.
///
/// `rating` stays untyped so that fractional or non-numeric values surface
/// as a `rating` field error rather than a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RateRecipeRequest {
    pub rating: Option<serde_json::Value>,
    pub comment: Option<String>,
}

impl RateRecipeRequest {
    /// The submitted rating as a whole number; range is checked by the ledger.
    pub fn whole_rating(&self) -> Result<i64, ValidationError> {
        let not_whole =
            || ValidationError::invalid_format("rating", "must be a whole number from 1 to 5");

        match &self.rating {
            None | Some(serde_json::Value::Null) => Err(ValidationError::empty_field("rating")),
            Some(serde_json::Value::Number(n)) => n
                .as_i64()
                .or_else(|| {
                    n.as_f64()
                        .filter(|f| f.fract() == 0.0 && f.abs() <= i64::MAX as f64)
                        .map(|f| f as i64)
                })
                .ok_or_else(not_whole),
            Some(_) => Err(not_whole()),
        }
    }
}

/// Page window parameters for author and favorite listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// One rating as exposed to clients.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub user: String,
    pub rating: u8,
    pub comment: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&RatingEntry> for RatingResponse {
    fn from(entry: &RatingEntry) -> Self {
        Self {
            user: entry.user_id.to_string(),
            rating: entry.score.value(),
            comment: entry.comment.clone(),
            created_at: entry.created_at.to_rfc3339(),
            updated_at: entry.updated_at.to_rfc3339(),
        }
    }
}

/// Full recipe record, derived fields included.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    pub id: String,
    pub author: String,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<Instruction>,
    pub cooking_time: u32,
    pub prep_time: u32,
    pub total_time: u64,
    pub servings: u32,
    pub difficulty: String,
    pub category: String,
    pub cuisine: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub is_public: bool,
    pub ratings: Vec<RatingResponse>,
    pub average_rating: f64,
    pub total_ratings: u32,
    pub views: u64,
    pub favorites: u64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<&Recipe> for RecipeResponse {
    fn from(recipe: &Recipe) -> Self {
        let content = recipe.content();
        Self {
            id: recipe.id().to_string(),
            author: recipe.author().to_string(),
            title: content.title.clone(),
            description: content.description.clone(),
            ingredients: content.ingredients.clone(),
            instructions: content.instructions.clone(),
            cooking_time: content.cooking_time,
            prep_time: content.prep_time,
            total_time: recipe.total_time(),
            servings: content.servings,
            difficulty: content.difficulty.as_str().to_string(),
            category: content.category.as_str().to_string(),
            cuisine: content.cuisine.clone(),
            tags: content.tags.clone(),
            image: content.image.clone(),
            is_public: content.is_public,
            ratings: recipe.ratings().entries().iter().map(Into::into).collect(),
            average_rating: recipe.average_rating(),
            total_ratings: recipe.total_ratings(),
            views: recipe.views(),
            favorites: recipe.favorites(),
            created_at: recipe.created_at().to_rfc3339(),
            updated_at: recipe.updated_at().to_rfc3339(),
        }
    }
}

/// A page of recipes.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeListResponse {
    pub recipes: Vec<RecipeResponse>,
    pub total_pages: u64,
    pub current_page: u32,
    pub total: u64,
}

impl From<RecipePage> for RecipeListResponse {
    fn from(page: RecipePage) -> Self {
        Self {
            recipes: page.records.iter().map(Into::into).collect(),
            total_pages: page.total_pages,
            current_page: page.current_page,
            total: page.total,
        }
    }
}

/// Response for recipe commands that return the record.
#[derive(Debug, Clone, Serialize)]
pub struct RecipeCommandResponse {
    pub message: String,
    pub recipe: RecipeResponse,
}

impl RecipeCommandResponse {
    pub fn new(message: impl Into<String>, recipe: &Recipe) -> Self {
        Self {
            message: message.into(),
            recipe: recipe.into(),
        }
    }
}

/// Response carrying only a message.
#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

/// One violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl From<&ValidationError> for FieldError {
    fn from(err: &ValidationError) -> Self {
        Self {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

/// Standard error body.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ErrorResponse {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            errors: None,
        }
    }

    pub fn validation(errors: &[ValidationError]) -> Self {
        Self {
            errors: Some(errors.iter().map(Into::into).collect()),
            ..Self::new("VALIDATION_FAILED", "Validation failed")
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("BAD_REQUEST", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new("FORBIDDEN", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }
}
