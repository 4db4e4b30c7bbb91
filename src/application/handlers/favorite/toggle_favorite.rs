//! ToggleFavoriteHandler - Command handler for favoriting a recipe.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::{RecipeId, UserId};
use crate::domain::recipe::RecipeError;
use crate::ports::{FavoriteToggle, UserRepository};

/// Command to flip a recipe in or out of the actor's favorites.
#[derive(Debug, Clone)]
pub struct ToggleFavoriteCommand {
    pub user_id: UserId,
    pub recipe_id: RecipeId,
}

/// Handler for favorite toggles.
pub struct ToggleFavoriteHandler {
    users: Arc<dyn UserRepository>,
}

impl ToggleFavoriteHandler {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// # Errors
    ///
    /// - `NotFound` if the recipe doesn't exist
    /// - `Conflict` if a concurrent toggle by the same user won
    pub async fn handle(&self, cmd: ToggleFavoriteCommand) -> Result<FavoriteToggle, RecipeError> {
        let outcome = self
            .users
            .toggle_favorite(&cmd.user_id, &cmd.recipe_id)
            .await
            .map_err(|err| {
                warn!(recipe_id = %cmd.recipe_id, error = %err, "Favorite toggle failed");
                RecipeError::from(err)
            })?;

        info!(
            user_id = %cmd.user_id,
            recipe_id = %cmd.recipe_id,
            favorited = outcome.favorited,
            favorites = outcome.favorites_count,
            "Favorite toggled"
        );
        Ok(outcome)
    }
}
