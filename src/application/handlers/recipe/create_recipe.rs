//! CreateRecipeHandler - Command handler for publishing a new recipe.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{RecipeId, Timestamp, UserId};
use crate::domain::recipe::{Recipe, RecipeDraft, RecipeError};
use crate::ports::{RecipeRepository, UserRepository};

/// Command to create a recipe.
#[derive(Debug, Clone)]
pub struct CreateRecipeCommand {
    pub author: UserId,
    pub draft: RecipeDraft,
}

/// Handler for creating recipes.
pub struct CreateRecipeHandler {
    recipes: Arc<dyn RecipeRepository>,
    users: Arc<dyn UserRepository>,
}

impl CreateRecipeHandler {
    pub fn new(recipes: Arc<dyn RecipeRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { recipes, users }
    }

    /// Validates the draft, stores the recipe and bumps the author's
    /// created-recipe counter.
    ///
    /// Nothing is persisted when validation fails.
    pub async fn handle(&self, cmd: CreateRecipeCommand) -> Result<Recipe, RecipeError> {
        let content = cmd.draft.validate()?;
        let recipe = Recipe::new(RecipeId::new(), cmd.author, content, Timestamp::now());

        self.recipes.insert(&recipe).await?;
        let created = self.users.adjust_recipe_count(recipe.author(), 1).await?;

        info!(
            recipe_id = %recipe.id(),
            author = %recipe.author(),
            recipes_created = created,
            "Recipe created"
        );
        Ok(recipe)
    }
}
