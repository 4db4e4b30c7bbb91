//! HTTP handlers for user-scoped endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::adapters::http::middleware::RequireAuth;
use crate::adapters::http::recipe::{
    handle_recipe_error, parse_recipe_id, PageParams, RecipeListResponse,
};
use crate::application::handlers::favorite::{
    ListFavoritesHandler, ListFavoritesQuery, ToggleFavoriteCommand, ToggleFavoriteHandler,
};
use crate::application::handlers::recipe::{ListAuthorRecipesHandler, ListAuthorRecipesQuery};

use super::dto::FavoriteToggleResponse;

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct UserHandlers {
    toggle_handler: Arc<ToggleFavoriteHandler>,
    favorites_handler: Arc<ListFavoritesHandler>,
    author_handler: Arc<ListAuthorRecipesHandler>,
}

impl UserHandlers {
    pub fn new(
        toggle_handler: Arc<ToggleFavoriteHandler>,
        favorites_handler: Arc<ListFavoritesHandler>,
        author_handler: Arc<ListAuthorRecipesHandler>,
    ) -> Self {
        Self {
            toggle_handler,
            favorites_handler,
            author_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/users/favorites/:recipeId - Toggle a favorite
pub async fn toggle_favorite(
    State(handlers): State<UserHandlers>,
    RequireAuth(user): RequireAuth,
    Path(recipe_id): Path<String>,
) -> Response {
    let recipe_id = match parse_recipe_id(&recipe_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = ToggleFavoriteCommand {
        user_id: user.id,
        recipe_id,
    };

    match handlers.toggle_handler.handle(cmd).await {
        Ok(toggle) => {
            (StatusCode::OK, Json(FavoriteToggleResponse::from(toggle))).into_response()
        }
        Err(e) => handle_recipe_error(e),
    }
}

/// GET /api/users/favorites - The actor's favorite recipes
pub async fn list_favorites(
    State(handlers): State<UserHandlers>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<PageParams>,
) -> Response {
    let query = ListFavoritesQuery {
        user_id: user.id,
        page: params.page,
        limit: params.limit,
    };

    match handlers.favorites_handler.handle(query).await {
        Ok(page) => (StatusCode::OK, Json(RecipeListResponse::from(page))).into_response(),
        Err(e) => handle_recipe_error(e),
    }
}

/// GET /api/users/my-recipes - The actor's own recipes, private included
pub async fn my_recipes(
    State(handlers): State<UserHandlers>,
    RequireAuth(user): RequireAuth,
    Query(params): Query<PageParams>,
) -> Response {
    let query = ListAuthorRecipesQuery {
        author: user.id.clone(),
        viewer: Some(user.id),
        page: params.page,
        limit: params.limit,
    };

    match handlers.author_handler.handle(query).await {
        Ok(page) => (StatusCode::OK, Json(RecipeListResponse::from(page))).into_response(),
        Err(e) => handle_recipe_error(e),
    }
}
