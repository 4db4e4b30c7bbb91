//! ListAuthorRecipesHandler - Query handler for one author's recipes.
//!
//! Serves both the public author page and "my recipes": private recipes
//! are included only when the viewer is the author.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::recipe::{ListingLimits, ListingScope, RecipeError, RecipePage, RecipeQuery};
use crate::ports::RecipeReader;

/// Query for an author's recipes, newest first.
#[derive(Debug, Clone)]
pub struct ListAuthorRecipesQuery {
    pub author: UserId,
    pub viewer: Option<UserId>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

/// Handler for author listings.
pub struct ListAuthorRecipesHandler {
    reader: Arc<dyn RecipeReader>,
    limits: ListingLimits,
}

impl ListAuthorRecipesHandler {
    pub fn new(reader: Arc<dyn RecipeReader>, limits: ListingLimits) -> Self {
        Self { reader, limits }
    }

    pub async fn handle(&self, query: ListAuthorRecipesQuery) -> Result<RecipePage, RecipeError> {
        let include_private = query.viewer.as_ref() == Some(&query.author);
        let window = RecipeQuery {
            page: query.page,
            limit: query.limit,
            ..RecipeQuery::default()
        };

        let plan = window.compile(
            self.limits,
            ListingScope::Author {
                author: query.author,
                include_private,
            },
        )?;

        Ok(self.reader.find_page(&plan).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;
    use crate::domain::foundation::{RecipeId, Timestamp};
    use crate::domain::recipe::fixtures::valid_draft;
    use crate::domain::recipe::{Recipe, RecipeDraft};
    use crate::ports::RecipeRepository;

    fn chef() -> UserId {
        UserId::new("chef-1").unwrap()
    }

    async fn add(store: &InMemoryStore, author: UserId, is_public: bool, at: Timestamp) -> RecipeId {
        let draft = RecipeDraft {
            is_public: Some(is_public),
            ..valid_draft()
        };
        let recipe = Recipe::new(RecipeId::new(), author, draft.validate().unwrap(), at);
        store.insert(&recipe).await.unwrap();
        *recipe.id()
    }

    fn query(viewer: Option<UserId>) -> ListAuthorRecipesQuery {
        ListAuthorRecipesQuery {
            author: chef(),
            viewer,
            page: None,
            limit: None,
        }
    }

    async fn seeded() -> (InMemoryStore, RecipeId, RecipeId) {
        let store = InMemoryStore::new();
        let base = Timestamp::now();
        let older = add(&store, chef(), true, base).await;
        let newer_private = add(&store, chef(), false, base.plus_millis(1_000)).await;
        add(&store, UserId::new("someone-else").unwrap(), true, base).await;
        (store, older, newer_private)
    }

    #[tokio::test]
    async fn others_see_only_public_recipes() {
        let (store, older, _) = seeded().await;
        let handler = ListAuthorRecipesHandler::new(Arc::new(store), ListingLimits::default());

        let page = handler.handle(query(None)).await.unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.records[0].id(), &older);
    }

    #[tokio::test]
    async fn author_sees_private_recipes_newest_first() {
        let (store, older, newer_private) = seeded().await;
        let handler = ListAuthorRecipesHandler::new(Arc::new(store), ListingLimits::default());

        let page = handler.handle(query(Some(chef()))).await.unwrap();

        let ids: Vec<RecipeId> = page.records.iter().map(|r| *r.id()).collect();
        assert_eq!(ids, vec![newer_private, older]);
    }

    #[tokio::test]
    async fn bad_page_is_rejected() {
        let handler =
            ListAuthorRecipesHandler::new(Arc::new(InMemoryStore::new()), ListingLimits::default());

        let err = handler
            .handle(ListAuthorRecipesQuery {
                page: Some("abc".into()),
                ..query(None)
            })
            .await
            .unwrap_err();

        assert!(matches!(err, RecipeError::Validation(_)));
    }
}
