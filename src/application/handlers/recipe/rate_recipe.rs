//! RateRecipeHandler - Command handler for submitting a rating.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{RecipeId, UserId};
use crate::domain::recipe::{RatingSubmission, Recipe, RecipeError};
use crate::ports::RecipeRepository;

/// Command to rate a recipe. Re-rating replaces the user's earlier entry.
#[derive(Debug, Clone)]
pub struct RateRecipeCommand {
    pub recipe_id: RecipeId,
    pub rater: UserId,
    pub rating: i64,
    pub comment: Option<String>,
}

/// Handler for rating recipes.
pub struct RateRecipeHandler {
    recipes: Arc<dyn RecipeRepository>,
}

impl RateRecipeHandler {
    pub fn new(recipes: Arc<dyn RecipeRepository>) -> Self {
        Self { recipes }
    }

    /// Returns the recipe with its recalculated rating summary.
    pub async fn handle(&self, cmd: RateRecipeCommand) -> Result<Recipe, RecipeError> {
        let submission = RatingSubmission::new(cmd.rating, cmd.comment.as_deref())?;

        let recipe = self
            .recipes
            .submit_rating(&cmd.recipe_id, &cmd.rater, &submission)
            .await?
            .ok_or_else(|| RecipeError::not_found(cmd.recipe_id))?;

        info!(
            recipe_id = %recipe.id(),
            rater = %cmd.rater,
            average_rating = recipe.average_rating(),
            total_ratings = recipe.total_ratings(),
            "Recipe rated"
        );
        Ok(recipe)
    }
}
