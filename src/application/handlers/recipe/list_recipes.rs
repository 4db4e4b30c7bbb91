//! ListRecipesHandler - Query handler for the public recipe listing.

use std::sync::Arc;

use tracing::debug;

use crate::domain::recipe::{ListingLimits, ListingScope, RecipeError, RecipePage, RecipeQuery};
use crate::ports::RecipeReader;

/// Handler for filtered, sorted, paginated public listings.
pub struct ListRecipesHandler {
    reader: Arc<dyn RecipeReader>,
    limits: ListingLimits,
}

impl ListRecipesHandler {
    pub fn new(reader: Arc<dyn RecipeReader>, limits: ListingLimits) -> Self {
        Self { reader, limits }
    }

    /// # Errors
    ///
    /// - `Validation` with every invalid parameter
    pub async fn handle(&self, query: RecipeQuery) -> Result<RecipePage, RecipeError> {
        let plan = query.compile(self.limits, ListingScope::Public)?;
        debug!(access_path = ?plan.access_path, page = plan.page.page, "Listing recipes");

        Ok(self.reader.find_page(&plan).await?)
    }
}
