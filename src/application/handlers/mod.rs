//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod favorite;
pub mod recipe;

pub use favorite::{
    ListFavoritesHandler, ListFavoritesQuery, ToggleFavoriteCommand, ToggleFavoriteHandler,
};
pub use recipe::{
    CreateRecipeCommand, CreateRecipeHandler, DeleteRecipeCommand, DeleteRecipeHandler,
    GetRecipeHandler, GetRecipeQuery, ListAuthorRecipesHandler, ListAuthorRecipesQuery,
    ListRecipesHandler, RateRecipeCommand, RateRecipeHandler, UpdateRecipeCommand,
    UpdateRecipeHandler,
};
