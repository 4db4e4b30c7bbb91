//! HTTP adapters - REST API implementations.
//!
//! Each module has its own HTTP adapter for endpoint exposure; `router`
//! assembles them.

pub mod middleware;
pub mod recipe;
pub mod router;
pub mod user;

pub use router::{api_router, HttpOptions, RecipeAppState};
