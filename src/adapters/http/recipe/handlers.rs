//! HTTP handlers for recipe endpoints.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, warn};

use crate::adapters::http::middleware::{OptionalAuth, RequireAuth};
use crate::application::handlers::recipe::{
    CreateRecipeCommand, CreateRecipeHandler, DeleteRecipeCommand, DeleteRecipeHandler,
    GetRecipeHandler, GetRecipeQuery, ListAuthorRecipesHandler, ListAuthorRecipesQuery,
    ListRecipesHandler, RateRecipeCommand, RateRecipeHandler, UpdateRecipeCommand,
    UpdateRecipeHandler,
};
use crate::domain::foundation::{RecipeId, UserId};
use crate::domain::recipe::{RecipeError, RecipeQuery};

use super::dto::{
    ErrorResponse, MessageResponse, PageParams, RateRecipeRequest, RecipeCommandResponse,
    RecipeListResponse, RecipeRequest, RecipeResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Handler state
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone)]
pub struct RecipeHandlers {
    list_handler: Arc<ListRecipesHandler>,
    author_handler: Arc<ListAuthorRecipesHandler>,
    get_handler: Arc<GetRecipeHandler>,
    create_handler: Arc<CreateRecipeHandler>,
    update_handler: Arc<UpdateRecipeHandler>,
    delete_handler: Arc<DeleteRecipeHandler>,
    rate_handler: Arc<RateRecipeHandler>,
}

impl RecipeHandlers {
    pub fn new(
        list_handler: Arc<ListRecipesHandler>,
        author_handler: Arc<ListAuthorRecipesHandler>,
        get_handler: Arc<GetRecipeHandler>,
        create_handler: Arc<CreateRecipeHandler>,
        update_handler: Arc<UpdateRecipeHandler>,
        delete_handler: Arc<DeleteRecipeHandler>,
        rate_handler: Arc<RateRecipeHandler>,
    ) -> Self {
        Self {
            list_handler,
            author_handler,
            get_handler,
            create_handler,
            update_handler,
            delete_handler,
            rate_handler,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// HTTP handlers
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/recipes - Filtered, sorted, paginated public listing
pub async fn list_recipes(
    State(handlers): State<RecipeHandlers>,
    Query(query): Query<RecipeQuery>,
) -> Response {
    match handlers.list_handler.handle(query).await {
        Ok(page) => (StatusCode::OK, Json(RecipeListResponse::from(page))).into_response(),
        Err(e) => handle_recipe_error(e),
    }
}

/// GET /api/recipes/user/:userId - Recipes of one author, newest first
pub async fn list_author_recipes(
    State(handlers): State<RecipeHandlers>,
    OptionalAuth(viewer): OptionalAuth,
    Path(author): Path<String>,
    Query(params): Query<PageParams>,
) -> Response {
    let Ok(author) = UserId::new(author) else {
        return (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("User not found")),
        )
            .into_response();
    };

    let query = ListAuthorRecipesQuery {
        author,
        viewer: viewer.map(|u| u.id),
        page: params.page,
        limit: params.limit,
    };

    match handlers.author_handler.handle(query).await {
        Ok(page) => (StatusCode::OK, Json(RecipeListResponse::from(page))).into_response(),
        Err(e) => handle_recipe_error(e),
    }
}

/// GET /api/recipes/:id - View one recipe (counts a view)
pub async fn get_recipe(
    State(handlers): State<RecipeHandlers>,
    Path(recipe_id): Path<String>,
) -> Response {
    let recipe_id = match parse_recipe_id(&recipe_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    match handlers.get_handler.handle(GetRecipeQuery { recipe_id }).await {
        Ok(recipe) => (StatusCode::OK, Json(RecipeResponse::from(&recipe))).into_response(),
        Err(e) => handle_recipe_error(e),
    }
}

/// POST /api/recipes - Create a recipe
pub async fn create_recipe(
    State(handlers): State<RecipeHandlers>,
    RequireAuth(user): RequireAuth,
    body: Result<Json<RecipeRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return handle_json_rejection(rejection),
    };

    let cmd = CreateRecipeCommand {
        author: user.id,
        draft: req.into(),
    };

    match handlers.create_handler.handle(cmd).await {
        Ok(recipe) => (
            StatusCode::CREATED,
            Json(RecipeCommandResponse::new("Recipe created successfully", &recipe)),
        )
            .into_response(),
        Err(e) => handle_recipe_error(e),
    }
}

/// PUT /api/recipes/:id - Update a recipe (author only)
pub async fn update_recipe(
    State(handlers): State<RecipeHandlers>,
    RequireAuth(user): RequireAuth,
    Path(recipe_id): Path<String>,
    body: Result<Json<RecipeRequest>, JsonRejection>,
) -> Response {
    let recipe_id = match parse_recipe_id(&recipe_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return handle_json_rejection(rejection),
    };

    let cmd = UpdateRecipeCommand {
        recipe_id,
        actor: user.id,
        patch: req.into(),
    };

    match handlers.update_handler.handle(cmd).await {
        Ok(recipe) => (
            StatusCode::OK,
            Json(RecipeCommandResponse::new("Recipe updated successfully", &recipe)),
        )
            .into_response(),
        Err(e) => handle_recipe_error(e),
    }
}

/// DELETE /api/recipes/:id - Delete a recipe (author only)
pub async fn delete_recipe(
    State(handlers): State<RecipeHandlers>,
    RequireAuth(user): RequireAuth,
    Path(recipe_id): Path<String>,
) -> Response {
    let recipe_id = match parse_recipe_id(&recipe_id) {
        Ok(id) => id,
        Err(response) => return response,
    };

    let cmd = DeleteRecipeCommand {
        recipe_id,
        actor: user.id,
    };

    match handlers.delete_handler.handle(cmd).await {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Recipe deleted successfully".to_string(),
            }),
        )
            .into_response(),
        Err(e) => handle_recipe_error(e),
    }
}

/// POST /api/recipes/:id/rate - Rate a recipe
pub async fn rate_recipe(
    State(handlers): State<RecipeHandlers>,
    RequireAuth(user): RequireAuth,
    Path(recipe_id): Path<String>,
    body: Result<Json<RateRecipeRequest>, JsonRejection>,
) -> Response {
    let recipe_id = match parse_recipe_id(&recipe_id) {
        Ok(id) => id,
        Err(response) => return response,
    };
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => return handle_json_rejection(rejection),
    };
    let rating = match req.whole_rating() {
        Ok(rating) => rating,
        Err(e) => return handle_recipe_error(e.into()),
    };

    let cmd = RateRecipeCommand {
        recipe_id,
        rater: user.id,
        rating,
        comment: req.comment,
    };

    match handlers.rate_handler.handle(cmd).await {
        Ok(recipe) => (
            StatusCode::OK,
            Json(RecipeCommandResponse::new("Rating added successfully", &recipe)),
        )
            .into_response(),
        Err(e) => handle_recipe_error(e),
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Error handling
// ════════════════════════════════════════════════════════════════════════════

/// Malformed ids can never name a recipe, so they are reported as missing.
pub(crate) fn parse_recipe_id(raw: &str) -> Result<RecipeId, Response> {
    raw.parse::<RecipeId>().map_err(|_| {
        (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Recipe not found")),
        )
            .into_response()
    })
}

pub(crate) fn handle_json_rejection(rejection: JsonRejection) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::bad_request(rejection.body_text())),
    )
        .into_response()
}

/// Client-facing text for every 409; the store's detail is only logged.
const CONFLICT_MESSAGE: &str = "The recipe was changed concurrently, please retry";

pub(crate) fn handle_recipe_error(error: RecipeError) -> Response {
    match error {
        RecipeError::Validation(errors) => (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::validation(&errors)),
        )
            .into_response(),
        RecipeError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::not_found("Recipe not found")),
        )
            .into_response(),
        RecipeError::Forbidden => (
            StatusCode::FORBIDDEN,
            Json(ErrorResponse::forbidden("Not authorized to modify this recipe")),
        )
            .into_response(),
        RecipeError::Conflict(msg) => {
            warn!(error = %msg, "Request lost a concurrent write");
            (
                StatusCode::CONFLICT,
                Json(ErrorResponse::conflict(CONFLICT_MESSAGE)),
            )
                .into_response()
        }
        RecipeError::Infrastructure(msg) => {
            error!(error = %msg, "Request failed on infrastructure error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::internal("Internal server error")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ValidationError;

    #[test]
    fn validation_maps_to_400() {
        let error = RecipeError::Validation(vec![ValidationError::empty_field("title")]);
        assert_eq!(handle_recipe_error(error).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_maps_to_404() {
        let error = RecipeError::not_found(RecipeId::new());
        assert_eq!(handle_recipe_error(error).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn forbidden_maps_to_403() {
        assert_eq!(
            handle_recipe_error(RecipeError::Forbidden).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn conflict_maps_to_409_without_store_detail() {
        let error = RecipeError::conflict("Recipe 42 was modified concurrently");
        let response = handle_recipe_error(error);
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(json["code"], "CONFLICT");
        assert_eq!(json["message"], CONFLICT_MESSAGE);
        assert!(!json["message"].as_str().unwrap().contains("42"));
    }

    #[test]
    fn infrastructure_maps_to_500() {
        let error = RecipeError::infrastructure("connection refused");
        assert_eq!(
            handle_recipe_error(error).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn malformed_id_is_404() {
        let response = parse_recipe_id("not-a-uuid").unwrap_err();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
