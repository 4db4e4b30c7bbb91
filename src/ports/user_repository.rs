//! User repository port.
//!
//! Users are referenced, not owned, by the recipe module. This port covers
//! the user-side state recipe operations touch: the favorite set and the
//! created-recipe counter.

use crate::domain::foundation::{DomainError, RecipeId, UserId};
use async_trait::async_trait;
use serde::Serialize;

/// Outcome of a favorite toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteToggle {
    /// Membership after the toggle.
    pub favorited: bool,
    /// The recipe's favorite counter after the toggle.
    pub favorites_count: u64,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Flip `recipe_id` in the user's favorite set and move the recipe's
    /// favorite counter by one in the same direction.
    ///
    /// The membership decision and the counter change are one conditional
    /// operation.
    ///
    /// # Errors
    ///
    /// - `RecipeNotFound` if the recipe doesn't exist
    /// - `Conflict` if a concurrent toggle won the race
    /// - `DatabaseError` on persistence failure
    async fn toggle_favorite(
        &self,
        user_id: &UserId,
        recipe_id: &RecipeId,
    ) -> Result<FavoriteToggle, DomainError>;

    /// Remove `recipe_id` from every user's favorite set.
    ///
    /// Returns the number of favorite entries removed.
    async fn purge_favorites(&self, recipe_id: &RecipeId) -> Result<u64, DomainError>;

    /// Add `delta` to the user's created-recipe counter, flooring at zero.
    ///
    /// Returns the new count.
    async fn adjust_recipe_count(&self, user_id: &UserId, delta: i64) -> Result<u64, DomainError>;
}
