//! HTTP routes for recipe endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_recipe, delete_recipe, get_recipe, list_author_recipes, list_recipes, rate_recipe,
    update_recipe, RecipeHandlers,
};

/// Creates the recipe router, mounted under `/api/recipes`.
pub fn recipe_routes(handlers: RecipeHandlers) -> Router {
    Router::new()
        .route("/", get(list_recipes).post(create_recipe))
        .route("/user/:user_id", get(list_author_recipes))
        .route(
            "/:id",
            get(get_recipe).put(update_recipe).delete(delete_recipe),
        )
        .route("/:id/rate", post(rate_recipe))
        .with_state(handlers)
}
