//! In-memory store implementing every persistence port.
//!
//! All state sits behind one lock, so each port call is atomic with
//! respect to every other call. Semantics match the Postgres adapters
//! except for text search, which matches exact lowercase tokens instead of
//! stemmed lexemes.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::foundation::{DomainError, RecipeId, Timestamp, UserId};
use crate::domain::recipe::{
    IndexSpec, PageRequest, QueryPlan, RatingSubmission, Recipe, RecipePage,
};
use crate::ports::{FavoriteToggle, RecipeReader, RecipeRepository, UserRepository};

#[derive(Debug, Default)]
struct State {
    recipes: HashMap<RecipeId, Recipe>,
    favorites: HashMap<UserId, Vec<RecipeId>>,
    recipe_counts: HashMap<UserId, u64>,
    indexes: HashSet<&'static str>,
}

/// In-memory store for tests and local development.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names of the indexes ensured so far.
    pub async fn index_names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.state.read().await.indexes.iter().copied().collect();
        names.sort_unstable();
        names
    }

    /// Current created-recipe count of a user.
    pub async fn recipes_created(&self, user_id: &UserId) -> u64 {
        self.state
            .read()
            .await
            .recipe_counts
            .get(user_id)
            .copied()
            .unwrap_or(0)
    }

    /// Recipe ids in a user's favorite set, in insertion order.
    pub async fn favorite_ids(&self, user_id: &UserId) -> Vec<RecipeId> {
        self.state
            .read()
            .await
            .favorites
            .get(user_id)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn recipe_count(&self) -> usize {
        self.state.read().await.recipes.len()
    }

    fn page_of(mut matching: Vec<&Recipe>, plan: &QueryPlan) -> RecipePage {
        matching.sort_by(|a, b| plan.compare(a, b));
        let total = matching.len() as u64;
        let records = matching
            .into_iter()
            .skip(plan.page.offset() as usize)
            .take(plan.page.limit as usize)
            .cloned()
            .collect();
        RecipePage::new(records, plan.page, total)
    }
}

#[async_trait]
impl RecipeRepository for InMemoryStore {
    async fn insert(&self, recipe: &Recipe) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        if state.recipes.contains_key(recipe.id()) {
            return Err(DomainError::conflict(format!(
                "Recipe {} already exists",
                recipe.id()
            )));
        }
        state.recipes.insert(*recipe.id(), recipe.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, DomainError> {
        Ok(self.state.read().await.recipes.get(id).cloned())
    }

    async fn update(&self, recipe: &Recipe, expected_version: i64) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        let stored = state
            .recipes
            .get_mut(recipe.id())
            .ok_or_else(|| DomainError::recipe_not_found(recipe.id()))?;

        if stored.version() != expected_version {
            return Err(DomainError::conflict(format!(
                "Recipe {} was modified concurrently",
                recipe.id()
            ))
            .with_detail("expected_version", expected_version.to_string())
            .with_detail("actual_version", stored.version().to_string()));
        }

        // Content only: ledger, counters and creation time stay as stored.
        *stored = Recipe::reconstitute(
            *stored.id(),
            stored.author().clone(),
            recipe.content().clone(),
            stored.ratings().clone(),
            stored.views(),
            stored.favorites(),
            recipe.version(),
            *stored.created_at(),
            *recipe.updated_at(),
        );
        Ok(())
    }

    async fn delete(&self, id: &RecipeId) -> Result<bool, DomainError> {
        Ok(self.state.write().await.recipes.remove(id).is_some())
    }

    async fn record_view(&self, id: &RecipeId) -> Result<Option<Recipe>, DomainError> {
        let mut state = self.state.write().await;
        Ok(state.recipes.get_mut(id).map(|recipe| {
            recipe.record_view();
            recipe.clone()
        }))
    }

    async fn submit_rating(
        &self,
        id: &RecipeId,
        user_id: &UserId,
        submission: &RatingSubmission,
    ) -> Result<Option<Recipe>, DomainError> {
        let mut state = self.state.write().await;
        Ok(state.recipes.get_mut(id).map(|recipe| {
            recipe.submit_rating(user_id, submission, Timestamp::now());
            recipe.clone()
        }))
    }

    async fn ensure_indexes(&self, indexes: &[IndexSpec]) -> Result<(), DomainError> {
        let mut state = self.state.write().await;
        for index in indexes {
            if state.indexes.insert(index.name) {
                debug!(index = index.name, "Registered in-memory index");
            }
        }
        Ok(())
    }
}

#[async_trait]
impl RecipeReader for InMemoryStore {
    async fn find_page(&self, plan: &QueryPlan) -> Result<RecipePage, DomainError> {
        let state = self.state.read().await;
        if let Some(index) = plan.access_path.index() {
            if !state.indexes.contains(index.name) {
                debug!(index = index.name, "Listing without its ensured index");
            }
        }

        let matching: Vec<&Recipe> = state
            .recipes
            .values()
            .filter(|r| plan.filter.matches(r))
            .collect();
        Ok(Self::page_of(matching, plan))
    }

    async fn find_favorites(
        &self,
        user_id: &UserId,
        page: PageRequest,
    ) -> Result<RecipePage, DomainError> {
        let state = self.state.read().await;
        let plan = QueryPlan::for_author(user_id.clone(), true, page);

        let matching: Vec<&Recipe> = state
            .favorites
            .get(user_id)
            .into_iter()
            .flatten()
            .filter_map(|id| state.recipes.get(id))
            .filter(|r| r.is_visible_to(Some(user_id)))
            .collect();
        Ok(Self::page_of(matching, &plan))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn toggle_favorite(
        &self,
        user_id: &UserId,
        recipe_id: &RecipeId,
    ) -> Result<FavoriteToggle, DomainError> {
        let mut state = self.state.write().await;
        let State {
            recipes, favorites, ..
        } = &mut *state;

        let recipe = recipes
            .get_mut(recipe_id)
            .ok_or_else(|| DomainError::recipe_not_found(recipe_id))?;
        let set = favorites.entry(user_id.clone()).or_default();

        let favorited = match set.iter().position(|id| id == recipe_id) {
            Some(index) => {
                set.remove(index);
                false
            }
            None => {
                set.push(*recipe_id);
                true
            }
        };
        let favorites_count = recipe.adjust_favorites(favorited);

        Ok(FavoriteToggle {
            favorited,
            favorites_count,
        })
    }

    async fn purge_favorites(&self, recipe_id: &RecipeId) -> Result<u64, DomainError> {
        let mut state = self.state.write().await;
        let mut removed = 0u64;
        for set in state.favorites.values_mut() {
            let before = set.len();
            set.retain(|id| id != recipe_id);
            removed += (before - set.len()) as u64;
        }
        Ok(removed)
    }

    async fn adjust_recipe_count(&self, user_id: &UserId, delta: i64) -> Result<u64, DomainError> {
        let mut state = self.state.write().await;
        let count = state.recipe_counts.entry(user_id.clone()).or_insert(0);
        *count = if delta >= 0 {
            count.saturating_add(delta.unsigned_abs())
        } else {
            count.saturating_sub(delta.unsigned_abs())
        };
        Ok(*count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;
    use crate::domain::recipe::{
        fixtures::valid_draft, ListingLimits, ListingScope, RatingSummary, RecipePatch,
        RecipeQuery, Score, RECIPE_INDEXES,
    };

    fn user(name: &str) -> UserId {
        UserId::new(name).unwrap()
    }

    async fn seeded(store: &InMemoryStore, author: &str, title: &str) -> Recipe {
        let mut draft = valid_draft();
        draft.title = Some(title.to_string());
        let recipe = Recipe::new(
            RecipeId::new(),
            user(author),
            draft.validate().unwrap(),
            Timestamp::now(),
        );
        store.insert(&recipe).await.unwrap();
        recipe
    }

    #[tokio::test]
    async fn concurrent_views_are_all_counted() {
        let store = InMemoryStore::new();
        let recipe = seeded(&store, "alice", "Soup").await;

        let views = (0..50).map(|_| {
            let store = store.clone();
            let id = *recipe.id();
            tokio::spawn(async move { store.record_view(&id).await })
        });
        for handle in futures::future::join_all(views).await {
            handle.unwrap().unwrap();
        }

        let stored = store.find_by_id(recipe.id()).await.unwrap().unwrap();
        assert_eq!(stored.views(), 50);
    }

    #[tokio::test]
    async fn concurrent_raters_lose_no_updates() {
        let store = InMemoryStore::new();
        let recipe = seeded(&store, "alice", "Soup").await;
        let scores: Vec<i64> = (0..40).map(|i| i % 5 + 1).collect();

        let ratings = scores.iter().enumerate().map(|(i, &score)| {
            let store = store.clone();
            let id = *recipe.id();
            tokio::spawn(async move {
                let submission = RatingSubmission::new(score, None).unwrap();
                store
                    .submit_rating(&id, &user(&format!("rater-{}", i)), &submission)
                    .await
            })
        });
        for handle in futures::future::join_all(ratings).await {
            assert!(handle.unwrap().unwrap().is_some());
        }

        let expected =
            RatingSummary::from_scores(scores.iter().map(|&s| Score::new(s).unwrap()));
        let stored = store.find_by_id(recipe.id()).await.unwrap().unwrap();
        assert_eq!(stored.total_ratings(), 40);
        assert_eq!(stored.ratings().entries().len(), 40);
        assert_eq!(stored.average_rating(), expected.average_rating());
    }

    #[tokio::test]
    async fn concurrent_toggles_by_one_user_keep_membership_and_counter_in_step() {
        let store = InMemoryStore::new();
        let recipe = seeded(&store, "alice", "Soup").await;

        let toggles = (0..21).map(|_| {
            let store = store.clone();
            let id = *recipe.id();
            tokio::spawn(async move { store.toggle_favorite(&user("bob"), &id).await })
        });

        let mut applied = 0;
        for handle in futures::future::join_all(toggles).await {
            match handle.unwrap() {
                Ok(_) => applied += 1,
                Err(e) => assert_eq!(e.code, ErrorCode::Conflict),
            }
        }

        let member = applied % 2 == 1;
        let favorites = store.favorite_ids(&user("bob")).await;
        let stored = store.find_by_id(recipe.id()).await.unwrap().unwrap();
        let listed = favorites.iter().filter(|id| *id == recipe.id()).count();
        assert_eq!(listed, usize::from(member));
        assert_eq!(stored.favorites(), u64::from(member));
    }

    #[tokio::test]
    async fn stale_update_is_a_conflict() {
        let store = InMemoryStore::new();
        let mut recipe = seeded(&store, "alice", "Soup").await;

        let patch = RecipePatch {
            title: Some("Stew".to_string()),
            ..RecipePatch::default()
        };
        recipe.apply_patch(&user("alice"), patch, Timestamp::now()).unwrap();
        store.update(&recipe, 1).await.unwrap();

        let err = store.update(&recipe, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn update_keeps_counters_and_ledger_written_meanwhile() {
        let store = InMemoryStore::new();
        let mut recipe = seeded(&store, "alice", "Soup").await;

        store.record_view(recipe.id()).await.unwrap();
        let submission = RatingSubmission::new(5, None).unwrap();
        store
            .submit_rating(recipe.id(), &user("bob"), &submission)
            .await
            .unwrap();

        let patch = RecipePatch {
            servings: Some(2),
            ..RecipePatch::default()
        };
        recipe.apply_patch(&user("alice"), patch, Timestamp::now()).unwrap();
        store.update(&recipe, 1).await.unwrap();

        let stored = store.find_by_id(recipe.id()).await.unwrap().unwrap();
        assert_eq!(stored.content().servings, 2);
        assert_eq!(stored.views(), 1);
        assert_eq!(stored.total_ratings(), 1);
        assert_eq!(stored.average_rating(), 5.0);
    }

    #[tokio::test]
    async fn toggle_flips_membership_and_counter() {
        let store = InMemoryStore::new();
        let recipe = seeded(&store, "alice", "Soup").await;

        let first = store.toggle_favorite(&user("bob"), recipe.id()).await.unwrap();
        assert_eq!(
            first,
            FavoriteToggle {
                favorited: true,
                favorites_count: 1
            }
        );
        let second = store.toggle_favorite(&user("bob"), recipe.id()).await.unwrap();
        assert_eq!(
            second,
            FavoriteToggle {
                favorited: false,
                favorites_count: 0
            }
        );
    }

    #[tokio::test]
    async fn toggle_unknown_recipe_is_not_found() {
        let store = InMemoryStore::new();
        let err = store
            .toggle_favorite(&user("bob"), &RecipeId::new())
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::RecipeNotFound);
    }

    #[tokio::test]
    async fn purge_removes_recipe_from_every_favorite_set() {
        let store = InMemoryStore::new();
        let recipe = seeded(&store, "alice", "Soup").await;
        let other = seeded(&store, "alice", "Bread").await;
        for name in ["bob", "carol"] {
            store.toggle_favorite(&user(name), recipe.id()).await.unwrap();
        }
        store.toggle_favorite(&user("bob"), other.id()).await.unwrap();

        assert_eq!(store.purge_favorites(recipe.id()).await.unwrap(), 2);
        assert_eq!(store.favorite_ids(&user("bob")).await, vec![*other.id()]);
        assert!(store.favorite_ids(&user("carol")).await.is_empty());
    }

    #[tokio::test]
    async fn recipe_count_floors_at_zero() {
        let store = InMemoryStore::new();
        assert_eq!(store.adjust_recipe_count(&user("a"), 1).await.unwrap(), 1);
        assert_eq!(store.adjust_recipe_count(&user("a"), -1).await.unwrap(), 0);
        assert_eq!(store.adjust_recipe_count(&user("a"), -1).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn ensure_indexes_is_idempotent() {
        let store = InMemoryStore::new();
        store.ensure_indexes(&RECIPE_INDEXES).await.unwrap();
        store.ensure_indexes(&RECIPE_INDEXES).await.unwrap();
        assert_eq!(store.index_names().await.len(), 3);
    }

    #[tokio::test]
    async fn find_page_hides_private_recipes_from_public_listing() {
        let store = InMemoryStore::new();
        seeded(&store, "alice", "Public").await;
        let mut hidden = seeded(&store, "alice", "Hidden").await;
        let patch = RecipePatch {
            is_public: Some(false),
            ..RecipePatch::default()
        };
        hidden.apply_patch(&user("alice"), patch, Timestamp::now()).unwrap();
        store.update(&hidden, 1).await.unwrap();

        let public = RecipeQuery::default()
            .compile(ListingLimits::default(), ListingScope::Public)
            .unwrap();
        let page = store.find_page(&public).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.records[0].content().title, "Public");

        let own = RecipeQuery::default()
            .compile(
                ListingLimits::default(),
                ListingScope::Author {
                    author: user("alice"),
                    include_private: true,
                },
            )
            .unwrap();
        assert_eq!(store.find_page(&own).await.unwrap().total, 2);
    }
}
