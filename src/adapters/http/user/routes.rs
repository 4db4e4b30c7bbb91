//! HTTP routes for user-scoped endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{list_favorites, my_recipes, toggle_favorite, UserHandlers};

/// Creates the user router, mounted under `/api/users`.
pub fn user_routes(handlers: UserHandlers) -> Router {
    Router::new()
        .route("/favorites", get(list_favorites))
        .route("/favorites/:recipe_id", post(toggle_favorite))
        .route("/my-recipes", get(my_recipes))
        .with_state(handlers)
}
