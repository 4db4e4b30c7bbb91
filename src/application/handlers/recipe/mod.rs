//! Recipe command and query handlers.

mod create_recipe;
mod delete_recipe;
mod get_recipe;
mod list_author_recipes;
mod list_recipes;
mod rate_recipe;
mod update_recipe;

pub use create_recipe::{CreateRecipeCommand, CreateRecipeHandler};
pub use delete_recipe::{DeleteRecipeCommand, DeleteRecipeHandler};
pub use get_recipe::{GetRecipeHandler, GetRecipeQuery};
pub use list_author_recipes::{ListAuthorRecipesHandler, ListAuthorRecipesQuery};
pub use list_recipes::ListRecipesHandler;
pub use rate_recipe::{RateRecipeCommand, RateRecipeHandler};
pub use update_recipe::{UpdateRecipeCommand, UpdateRecipeHandler};
