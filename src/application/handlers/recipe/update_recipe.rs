//! UpdateRecipeHandler - Command handler for editing a recipe.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::foundation::{RecipeId, Timestamp, UserId};
use crate::domain::recipe::{Recipe, RecipeError, RecipePatch};
use crate::ports::RecipeRepository;

/// Command to update a recipe's content.
#[derive(Debug, Clone)]
pub struct UpdateRecipeCommand {
    pub recipe_id: RecipeId,
    pub actor: UserId,
    pub patch: RecipePatch,
}

/// Handler for updating recipes.
pub struct UpdateRecipeHandler {
    recipes: Arc<dyn RecipeRepository>,
}

impl UpdateRecipeHandler {
    pub fn new(recipes: Arc<dyn RecipeRepository>) -> Self {
        Self { recipes }
    }

    /// Merges the patch over the stored content and writes it back if no
    /// one else changed the recipe in between.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the recipe doesn't exist
    /// - `Forbidden` if the actor is not the author
    /// - `Validation` if the merged content is invalid
    /// - `Conflict` if the recipe was modified concurrently
    pub async fn handle(&self, cmd: UpdateRecipeCommand) -> Result<Recipe, RecipeError> {
        let mut recipe = self
            .recipes
            .find_by_id(&cmd.recipe_id)
            .await?
            .ok_or_else(|| RecipeError::not_found(cmd.recipe_id))?;

        let expected_version = recipe.version();
        recipe.apply_patch(&cmd.actor, cmd.patch, Timestamp::now())?;

        if let Err(err) = self.recipes.update(&recipe, expected_version).await {
            warn!(recipe_id = %cmd.recipe_id, error = %err, "Recipe update rejected");
            return Err(err.into());
        }

        // Counters may have moved while the content was being edited.
        let stored = self
            .recipes
            .find_by_id(&cmd.recipe_id)
            .await?
            .ok_or_else(|| RecipeError::not_found(cmd.recipe_id))?;

        info!(recipe_id = %stored.id(), version = stored.version(), "Recipe updated");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::{DomainError, ErrorCode};
    use crate::domain::recipe::fixtures::valid_draft;
    use crate::domain::recipe::{IndexSpec, RatingSubmission};
    use async_trait::async_trait;

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
        *recipe.id()
    }

    fn retitle(recipe_id: RecipeId, actor: UserId, title: &str) -> UpdateRecipeCommand {
        UpdateRecipeCommand {
            recipe_id,
            actor,
            patch: RecipePatch {
                title: Some(title.to_string()),
                ..RecipePatch::default()
            },
        }
    }

    #[tokio::test]
    async fn author_can_patch_single_field() {
        let store = InMemoryStore::new();
        let id = seeded(&store).await;
        let handler = UpdateRecipeHandler::new(Arc::new(store));

        let recipe = handler.handle(retitle(id, chef(), "Lime Tart")).await.unwrap();

        assert_eq!(recipe.content().title, "Lime Tart");
        assert_eq!(recipe.content().description, "Sharp and sweet");
        assert_eq!(recipe.version(), 2);
    }

    #[tokio::test]
    async fn update_keeps_ratings_and_summary() {
        let store = InMemoryStore::new();
        let id = seeded(&store).await;
        let rater = UserId::new("eater-1").unwrap();
        store
            .submit_rating(&id, &rater, &RatingSubmission::new(4, None).unwrap())
            .await
            .unwrap();
        let handler = UpdateRecipeHandler::new(Arc::new(store));

        let recipe = handler.handle(retitle(id, chef(), "Lime Tart")).await.unwrap();

        assert_eq!(recipe.average_rating(), 4.0);
        assert_eq!(recipe.total_ratings(), 1);
    }

    #[tokio::test]
    async fn other_users_are_forbidden() {
        let store = InMemoryStore::new();
        let id = seeded(&store).await;
        let handler = UpdateRecipeHandler::new(Arc::new(store.clone()));

        let err = handler
            .handle(retitle(id, UserId::new("intruder").unwrap(), "Mine now"))
            .await
            .unwrap_err();

        assert_eq!(err, RecipeError::Forbidden);
        let stored = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.content().title, "Lemon Tart");
    }

    #[tokio::test]
    async fn invalid_merge_is_rejected() {
        let store = InMemoryStore::new();
        let id = seeded(&store).await;
        let handler = UpdateRecipeHandler::new(Arc::new(store));

        let err = handler
            .handle(UpdateRecipeCommand {
                recipe_id: id,
                actor: chef(),
                patch: RecipePatch {
                    ingredients: Some(vec![]),
                    ..RecipePatch::default()
                },
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RecipeError::Validation(_)));
    }

    #[tokio::test]
    async fn unknown_recipe_is_not_found() {
        let handler = UpdateRecipeHandler::new(Arc::new(InMemoryStore::new()));

        let err = handler
            .handle(retitle(RecipeId::new(), chef(), "Ghost"))
            .await
            .unwrap_err();

        assert!(matches!(err, RecipeError::NotFound(_)));
    }

    /// Repository whose stored version always moves on before the write.
    struct RacingRepository {
        inner: InMemoryStore,
    }

    #[async_trait]
    impl RecipeRepository for RacingRepository {
        async fn insert(&self, recipe: &Recipe) -> Result<(), DomainError> {
            self.inner.insert(recipe).await
        }

        async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, DomainError> {
            self.inner.find_by_id(id).await
        }

        async fn update(&self, _recipe: &Recipe, expected: i64) -> Result<(), DomainError> {
            Err(DomainError::new(ErrorCode::Conflict, "stale")
                .with_detail("expected_version", expected.to_string()))
        }

        async fn delete(&self, id: &RecipeId) -> Result<bool, DomainError> {
            self.inner.delete(id).await
        }

        async fn record_view(&self, id: &RecipeId) -> Result<Option<Recipe>, DomainError> {
            self.inner.record_view(id).await
        }

        async fn submit_rating(
            &self,
            id: &RecipeId,
            user_id: &UserId,
            submission: &RatingSubmission,
        ) -> Result<Option<Recipe>, DomainError> {
            self.inner.submit_rating(id, user_id, submission).await
        }

        async fn ensure_indexes(&self, indexes: &[IndexSpec]) -> Result<(), DomainError> {
            self.inner.ensure_indexes(indexes).await
        }
    }

    #[tokio::test]
    async fn stale_version_surfaces_as_conflict() {
        let store = InMemoryStore::new();
        let id = seeded(&store).await;
        let handler = UpdateRecipeHandler::new(Arc::new(RacingRepository { inner: store }));

        let err = handler.handle(retitle(id, chef(), "Lime Tart")).await.unwrap_err();

        assert!(matches!(err, RecipeError::Conflict(_)));
    }
}
