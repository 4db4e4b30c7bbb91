//! Top-level axum router: mounts the recipe and user APIs behind the
//! auth middleware and the shared tower-http stack.

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::MatchedPath, middleware, routing::get, Json, Router};
use http::{HeaderValue, Method, Request, Response};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, info_span, warn, Span};

use crate::application::handlers::favorite::{ListFavoritesHandler, ToggleFavoriteHandler};
use crate::application::handlers::recipe::{
    CreateRecipeHandler, DeleteRecipeHandler, GetRecipeHandler, ListAuthorRecipesHandler,
    ListRecipesHandler, RateRecipeHandler, UpdateRecipeHandler,
};
use crate::domain::recipe::ListingLimits;
use crate::ports::{RecipeReader, RecipeRepository, SessionValidator, UserRepository};

use super::middleware::auth_middleware;
use super::recipe::{recipe_routes, RecipeHandlers};
use super::user::{user_routes, UserHandlers};

/// Ports the HTTP surface is wired against.
#[derive(Clone)]
pub struct RecipeAppState {
    pub recipes: Arc<dyn RecipeRepository>,
    pub reader: Arc<dyn RecipeReader>,
    pub users: Arc<dyn UserRepository>,
    pub session_validator: Arc<dyn SessionValidator>,
    pub limits: ListingLimits,
}

impl RecipeAppState {
    fn recipe_handlers(&self) -> RecipeHandlers {
        RecipeHandlers::new(
            Arc::new(ListRecipesHandler::new(self.reader.clone(), self.limits)),
            Arc::new(ListAuthorRecipesHandler::new(self.reader.clone(), self.limits)),
            Arc::new(GetRecipeHandler::new(self.recipes.clone())),
            Arc::new(CreateRecipeHandler::new(self.recipes.clone(), self.users.clone())),
            Arc::new(UpdateRecipeHandler::new(self.recipes.clone())),
            Arc::new(DeleteRecipeHandler::new(self.recipes.clone(), self.users.clone())),
            Arc::new(RateRecipeHandler::new(self.recipes.clone())),
        )
    }

    fn user_handlers(&self) -> UserHandlers {
        UserHandlers::new(
            Arc::new(ToggleFavoriteHandler::new(self.users.clone())),
            Arc::new(ListFavoritesHandler::new(self.reader.clone(), self.limits)),
            Arc::new(ListAuthorRecipesHandler::new(self.reader.clone(), self.limits)),
        )
    }
}

/// Transport settings applied around every route.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub request_timeout: Duration,
    /// Allowed CORS origins; empty allows any origin.
    pub cors_origins: Vec<String>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            cors_origins: Vec::new(),
        }
    }
}

/// Builds the complete application router.
///
/// # Routes
///
/// - `/api/recipes/...` - Recipe CRUD, rating and listings
/// - `/api/users/...` - Favorites and own recipes
/// - `GET /health` - Liveness
pub fn api_router(state: RecipeAppState, options: &HttpOptions) -> Router {
    let api = Router::new()
        .nest("/api/recipes", recipe_routes(state.recipe_handlers()))
        .nest("/api/users", user_routes(state.user_handlers()))
        .layer(middleware::from_fn_with_state(
            state.session_validator.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(options.request_timeout))
        .layer(cors_layer(&options.cors_origins))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let path = request
                        .extensions()
                        .get::<MatchedPath>()
                        .map(MatchedPath::as_str)
                        .unwrap_or(request.uri().path());
                    let request_id = request
                        .headers()
                        .get("x-request-id")
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("-");

                    info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %path,
                        request_id = %request_id,
                    )
                })
                .on_response(
                    |response: &Response<_>, latency: Duration, _span: &Span| {
                        let status = response.status().as_u16();
                        let latency_ms = latency.as_millis() as u64;
                        if status >= 500 {
                            error!(status, latency_ms, "Request failed with server error");
                        } else {
                            info!(status, latency_ms, "Request completed");
                        }
                    },
                ),
        )
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    if origins.is_empty() {
        return base.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    base.allow_origin(AllowOrigin::list(allowed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use crate::adapters::memory::InMemoryStore;
    use axum::{body::Body, http::StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        let store = InMemoryStore::new();
        let state = RecipeAppState {
            recipes: Arc::new(store.clone()),
            reader: Arc::new(store.clone()),
            users: Arc::new(store),
            session_validator: Arc::new(MockSessionValidator::new()),
            limits: ListingLimits::default(),
        };
        api_router(state, &HttpOptions::default())
    }

    #[tokio::test]
    async fn health_is_ok() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn protected_routes_require_auth() {
        let response = app()
            .oneshot(
                Request::post("/api/recipes")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn invalid_cors_origins_are_skipped() {
        let _ = cors_layer(&["https://ok.example".to_string(), "bad\norigin".to_string()]);
    }
}
