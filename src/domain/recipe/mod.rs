//! Recipe domain module.
//!
//! Holds the recipe aggregate together with its rating ledger, the rating
//! summary recalculator and the listing query compiler.
//!
//! # Flow
//!
//! - Rating submissions go through `Recipe::submit_rating`, which upserts
//!   the ledger entry and recalculates the summary in one step
//! - Listings compile a `RecipeQuery` into a `QueryPlan` that stores
//!   evaluate against the indexes declared in `RECIPE_INDEXES`

mod aggregate;
mod draft;
mod errors;
mod ledger;
mod query;
mod rating_summary;
mod values;

pub use aggregate::Recipe;
pub use draft::{
    IngredientInput, InstructionInput, RecipeContent, RecipeDraft, RecipePatch, MAX_COUNT,
};
pub use errors::RecipeError;
pub use ledger::{
    LedgerChange, RatingEntry, RatingLedger, RatingSubmission, Score, MAX_COMMENT_LENGTH,
};
pub use query::{
    search_text, tokenize, AccessPath, IndexColumn, IndexKind, IndexSpec, ListingLimits,
    ListingScope, PageRequest, QueryPlan, RecipeFilter, RecipePage, RecipeQuery, SortDirection,
    SortField, SortKey, TextSearch, AUTHOR_CREATED_AT_INDEX, CATEGORY_DIFFICULTY_RATING_INDEX,
    RECIPE_INDEXES, TEXT_INDEX,
};
pub use rating_summary::RatingSummary;
pub use values::{
    normalize_tags, Category, Difficulty, Ingredient, Instruction, MAX_DESCRIPTION_LENGTH,
    MAX_TITLE_LENGTH,
};

#[cfg(test)]
pub(crate) use draft::fixtures;
