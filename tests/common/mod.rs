//! Shared harness: the full router over an in-memory store with fixed
//! bearer tokens.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use recipe_share::adapters::auth::MockSessionValidator;
use recipe_share::adapters::http::{api_router, HttpOptions, RecipeAppState};
use recipe_share::adapters::memory::InMemoryStore;
use recipe_share::domain::recipe::ListingLimits;

pub const ALICE: &str = "token-alice";
pub const BOB: &str = "token-bob";
pub const CAROL: &str = "token-carol";

pub struct TestApp {
    pub router: Router,
    pub store: InMemoryStore,
}

impl TestApp {
    pub fn new() -> Self {
        let store = InMemoryStore::new();
        let validator = MockSessionValidator::new()
            .with_test_user(ALICE, "alice")
            .with_test_user(BOB, "bob")
            .with_test_user(CAROL, "carol");

        let state = RecipeAppState {
            recipes: Arc::new(store.clone()),
            reader: Arc::new(store.clone()),
            users: Arc::new(store.clone()),
            session_validator: Arc::new(validator),
            limits: ListingLimits::default(),
        };

        Self {
            router: api_router(state, &HttpOptions::default()),
            store,
        }
    }

    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.send(Method::GET, uri, token, None).await
    }

    /// Creates a recipe and returns its id.
    pub async fn create(&self, token: &str, body: Value) -> String {
        let (status, json) = self
            .send(Method::POST, "/api/recipes", Some(token), Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", json);
        json["recipe"]["id"].as_str().unwrap().to_string()
    }

    pub async fn rate(&self, token: &str, id: &str, rating: i64) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            &format!("/api/recipes/{}/rate", id),
            Some(token),
            Some(json!({ "rating": rating })),
        )
        .await
    }
}

/// A valid create body.
pub fn recipe_body(title: &str, category: &str) -> Value {
    json!({
        "title": title,
        "description": "A reliable weeknight recipe",
        "ingredients": [
            { "name": "flour", "amount": "200", "unit": "g" },
            { "name": "butter", "amount": "100", "unit": "g" }
        ],
        "instructions": [
            { "step": 1, "description": "Mix everything" },
            { "step": 2, "description": "Bake until golden" }
        ],
        "cookingTime": 25,
        "prepTime": 10,
        "servings": 4,
        "difficulty": "Easy",
        "category": category,
        "cuisine": "French",
        "tags": ["Baking", "baking", " quick "]
    })
}
