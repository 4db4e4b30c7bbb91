//! GetRecipeHandler - Query handler for viewing one recipe.
//!
//! Viewing counts: the store increments the view counter and returns the
//! record in one operation.

use std::sync::Arc;

use tracing::debug;

use crate::domain::foundation::RecipeId;
use crate::domain::recipe::{Recipe, RecipeError};
use crate::ports::RecipeRepository;

/// Query to view a recipe by ID.
#[derive(Debug, Clone)]
pub struct GetRecipeQuery {
    pub recipe_id: RecipeId,
}

/// Handler for viewing recipes.
pub struct GetRecipeHandler {
    recipes: Arc<dyn RecipeRepository>,
}

impl GetRecipeHandler {
    pub fn new(recipes: Arc<dyn RecipeRepository>) -> Self {
        Self { recipes }
    }

    pub async fn handle(&self, query: GetRecipeQuery) -> Result<Recipe, RecipeError> {
        let recipe = self
            .recipes
            .record_view(&query.recipe_id)
            .await?
            .ok_or_else(|| RecipeError::not_found(query.recipe_id))?;

        debug!(recipe_id = %recipe.id(), views = recipe.views(), "Recipe viewed");
        Ok(recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::{Timestamp, UserId};
    use crate::domain::recipe::fixtures::valid_draft;

    async fn seeded(store: &InMemoryStore) -> RecipeId {
        let recipe = Recipe::new(
            RecipeId::new(),
            UserId::new("chef-1").unwrap(),
            valid_draft().validate().unwrap(),
            Timestamp::now(),
        );
        store.insert(&recipe).await.unwrap();
        *recipe.id()
    }

    #[tokio::test]
    async fn each_view_is_counted() {
        let store = InMemoryStore::new();
        let id = seeded(&store).await;
        let handler = GetRecipeHandler::new(Arc::new(store));

        let first = handler.handle(GetRecipeQuery { recipe_id: id }).await.unwrap();
        let second = handler.handle(GetRecipeQuery { recipe_id: id }).await.unwrap();

        assert_eq!(first.views(), 1);
        assert_eq!(second.views(), 2);
        assert_eq!(second.total_time(), 45);
    }

    #[tokio::test]
    async fn unknown_recipe_is_not_found() {
        let handler = GetRecipeHandler::new(Arc::new(InMemoryStore::new()));

        let err = handler
            .handle(GetRecipeQuery {
                recipe_id: RecipeId::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RecipeError::NotFound(_)));
    }
}
