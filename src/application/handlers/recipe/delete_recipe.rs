//! DeleteRecipeHandler - Command handler for removing a recipe.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{RecipeId, UserId};
use crate::domain::recipe::RecipeError;
use crate::ports::{RecipeRepository, UserRepository};

/// Command to delete a recipe.
#[derive(Debug, Clone)]
pub struct DeleteRecipeCommand {
    pub recipe_id: RecipeId,
    pub actor: UserId,
}

/// Handler for deleting recipes.
pub struct DeleteRecipeHandler {
    recipes: Arc<dyn RecipeRepository>,
    users: Arc<dyn UserRepository>,
}

impl DeleteRecipeHandler {
    pub fn new(recipes: Arc<dyn RecipeRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { recipes, users }
    }

    /// Hard-deletes the recipe, then drops it from every favorite set and
    /// decrements the author's created-recipe counter.
    pub async fn handle(&self, cmd: DeleteRecipeCommand) -> Result<(), RecipeError> {
        let recipe = self
            .recipes
            .find_by_id(&cmd.recipe_id)
            .await?
            .ok_or_else(|| RecipeError::not_found(cmd.recipe_id))?;
        recipe.authorize(&cmd.actor)?;

        if !self.recipes.delete(&cmd.recipe_id).await? {
            return Err(RecipeError::not_found(cmd.recipe_id));
        }

        let purged = self.users.purge_favorites(&cmd.recipe_id).await?;
        let remaining = self.users.adjust_recipe_count(recipe.author(), -1).await?;

        info!(
            recipe_id = %cmd.recipe_id,
            favorites_purged = purged,
            recipes_created = remaining,
            "Recipe deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::Timestamp;
    use crate::domain::recipe::fixtures::valid_draft;
    use crate::domain::recipe::Recipe;

    fn chef() -> UserId {
        UserId::new("chef-1").unwrap()
    }

    async fn seeded(store: &InMemoryStore) -> RecipeId {
        let recipe = Recipe::new(
            RecipeId::new(),
            chef(),
            valid_draft().validate().unwrap(),
            Timestamp::now(),
        );
        store.insert(&recipe).await.unwrap();
        store.adjust_recipe_count(&chef(), 1).await.unwrap();
        *recipe.id()
    }

    fn handler(store: &InMemoryStore) -> DeleteRecipeHandler {
        DeleteRecipeHandler::new(Arc::new(store.clone()), Arc::new(store.clone()))
    }

    #[tokio::test]
    async fn delete_purges_favorites_and_decrements_count() {
        let store = InMemoryStore::new();
        let id = seeded(&store).await;
        let fan = UserId::new("fan-1").unwrap();
        store.toggle_favorite(&fan, &id).await.unwrap();

        handler(&store)
            .handle(DeleteRecipeCommand {
                recipe_id: id,
                actor: chef(),
            })
            .await
            .unwrap();

        assert!(store.find_by_id(&id).await.unwrap().is_none());
        assert!(store.favorite_ids(&fan).await.is_empty());
        assert_eq!(store.recipes_created(&chef()).await, 0);
    }

    #[tokio::test]
    async fn only_author_may_delete() {
        let store = InMemoryStore::new();
        let id = seeded(&store).await;

        let err = handler(&store)
            .handle(DeleteRecipeCommand {
                recipe_id: id,
                actor: UserId::new("intruder").unwrap(),
            })
            .await
            .unwrap_err();

        assert_eq!(err, RecipeError::Forbidden);
        assert!(store.find_by_id(&id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn deleting_twice_is_not_found() {
        let store = InMemoryStore::new();
        let id = seeded(&store).await;
        let handler = handler(&store);
        let cmd = DeleteRecipeCommand {
            recipe_id: id,
            actor: chef(),
        };

        handler.handle(cmd.clone()).await.unwrap();
        let err = handler.handle(cmd).await.unwrap_err();

        assert!(matches!(err, RecipeError::NotFound(_)));
        assert_eq!(store.recipes_created(&chef()).await, 0);
    }
}
