//! ListFavoritesHandler - Query handler for the actor's favorite recipes.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::recipe::{ListingLimits, ListingScope, RecipeError, RecipePage, RecipeQuery};
use crate::ports::RecipeReader;

/// Query for a user's favorites, newest recipe first.
#[derive(Debug, Clone)]
pub struct ListFavoritesQuery {
    pub user_id: UserId,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Handler for favorite listings.
pub struct ListFavoritesHandler {
    reader: Arc<dyn RecipeReader>,
    limits: ListingLimits,
}

impl ListFavoritesHandler {
    pub fn new(reader: Arc<dyn RecipeReader>, limits: ListingLimits) -> Self {
        Self { reader, limits }
    }

    pub async fn handle(&self, query: ListFavoritesQuery) -> Result<RecipePage, RecipeError> {
        let window = RecipeQuery {
            page: query.page,
            limit: query.limit,
            ..RecipeQuery::default()
        };
        let plan = window.compile(self.limits, ListingScope::Public)?;

        Ok(self.reader.find_favorites(&query.user_id, plan.page).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::{RecipeId, Timestamp};
    use crate::domain::recipe::fixtures::valid_draft;
    use crate::domain::recipe::{Recipe, RecipeDraft};
    use crate::ports::{RecipeRepository, UserRepository};

    fn fan() -> UserId {
        UserId::new("fan").unwrap()
    }

    async fn favorited(store: &InMemoryStore, is_public: bool, at: Timestamp) -> RecipeId {
        let draft = RecipeDraft {
            is_public: Some(is_public),
            ..valid_draft()
        };
        let recipe = Recipe::new(
            RecipeId::new(),
            UserId::new("chef-1").unwrap(),
            draft.validate().unwrap(),
            at,
        );
        store.insert(&recipe).await.unwrap();
        store.toggle_favorite(&fan(), recipe.id()).await.unwrap();
        *recipe.id()
    }

    fn query(limit: Option<&str>) -> ListFavoritesQuery {
        ListFavoritesQuery {
            user_id: fan(),
            page: None,
            limit: limit.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn lists_favorites_newest_first_with_totals() {
        let store = InMemoryStore::new();
        let base = Timestamp::now();
        let older = favorited(&store, true, base).await;
        let newer = favorited(&store, true, base.plus_millis(1_000)).await;
        let handler = ListFavoritesHandler::new(Arc::new(store), ListingLimits::default());

        let page = handler.handle(query(Some("1"))).await.unwrap();

        assert_eq!(page.total, 2);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.records[0].id(), &newer);
        assert_ne!(page.records[0].id(), &older);
    }

    #[tokio::test]
    async fn other_authors_private_recipes_are_left_out() {
        let store = InMemoryStore::new();
        favorited(&store, false, Timestamp::now()).await;
        let handler = ListFavoritesHandler::new(Arc::new(store), ListingLimits::default());

        let page = handler.handle(query(None)).await.unwrap();

        assert_eq!(page.total, 0);
        assert!(page.records.is_empty());
    }
}
