//! Recipe repository port (write side).
//!
//! Defines the contract for persisting Recipe aggregates.
//!
//! # Concurrency
//!
//! Every mutating method is a single atomic store operation:
//!
//! - `record_view` is an in-place increment, never read-modify-write
//! - `submit_rating` upserts the user's ledger entry and stores the
//!   recalculated summary in one unit
//! - `update` only succeeds when the stored version equals the expected one

use crate::domain::foundation::{DomainError, RecipeId, UserId};
use crate::domain::recipe::{IndexSpec, RatingSubmission, Recipe};
use async_trait::async_trait;

/// Repository port for Recipe aggregate persistence.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Save a new recipe.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn insert(&self, recipe: &Recipe) -> Result<(), DomainError>;

    /// Find a recipe by its ID, ratings included.
    ///
    /// Returns `None` if not found. Does not count a view.
    async fn find_by_id(&self, id: &RecipeId) -> Result<Option<Recipe>, DomainError>;

    /// Persist the recipe's content if the stored version still equals
    /// `expected_version`. Derived fields and counters are never written.
    ///
    /// # Errors
    ///
    /// - `RecipeNotFound` if the recipe doesn't exist
    /// - `Conflict` if the stored version moved on
    /// - `DatabaseError` on persistence failure
    async fn update(&self, recipe: &Recipe, expected_version: i64) -> Result<(), DomainError>;

    /// Hard-delete a recipe and its rating ledger.
    ///
    /// Returns `false` if there was nothing to delete.
    async fn delete(&self, id: &RecipeId) -> Result<bool, DomainError>;

    /// Atomically increment the view counter and return the recipe as it
    /// is after the increment.
    ///
    /// Returns `None` if not found.
    async fn record_view(&self, id: &RecipeId) -> Result<Option<Recipe>, DomainError>;

    /// Upsert `user_id`'s rating and store the recalculated summary as one
    /// atomic unit.
    ///
    /// Returns `None` if the recipe doesn't exist.
    async fn submit_rating(
        &self,
        id: &RecipeId,
        user_id: &UserId,
        submission: &RatingSubmission,
    ) -> Result<Option<Recipe>, DomainError>;

    /// Make sure every index in `indexes` exists. Idempotent.
    async fn ensure_indexes(&self, indexes: &[IndexSpec]) -> Result<(), DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn RecipeRepository) {}
    }
}
