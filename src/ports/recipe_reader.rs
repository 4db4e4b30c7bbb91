//! Recipe reader port (read side / listing queries).
//!
//! Readers evaluate compiled `QueryPlan`s; they never interpret raw
//! request parameters.

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::recipe::{PageRequest, QueryPlan, RecipePage};
use async_trait::async_trait;

/// Reader port for recipe listings.
#[async_trait]
pub trait RecipeReader: Send + Sync {
    /// Evaluate a listing plan: filter, order, then take the page window.
    ///
    /// `total` counts every matching recipe, not just the page.
    async fn find_page(&self, plan: &QueryPlan) -> Result<RecipePage, DomainError>;

    /// List the recipes a user has favorited, newest recipe first.
    ///
    /// Private recipes of other authors are left out.
    async fn find_favorites(
        &self,
        user_id: &UserId,
        page: PageRequest,
    ) -> Result<RecipePage, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipe_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn RecipeReader) {}
    }
}
