//! HTTP adapter for recipe endpoints.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ErrorResponse, FieldError, MessageResponse, PageParams, RateRecipeRequest,
    RecipeCommandResponse, RecipeListResponse, RecipeRequest, RecipeResponse,
};
pub use handlers::RecipeHandlers;
pub(crate) use handlers::{handle_recipe_error, parse_recipe_id};
pub use routes::recipe_routes;
