//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `RecipeRepository` - Recipe writes, view counting, rating upserts, indexes
//! - `RecipeReader` - Listing queries over compiled plans
//! - `UserRepository` - Favorite sets and created-recipe counters
//!
//! ## Identity Ports
//!
//! - `SessionValidator` - Bearer token validation

mod recipe_reader;
mod recipe_repository;
mod session_validator;
mod user_repository;

pub use recipe_reader::RecipeReader;
pub use recipe_repository::RecipeRepository;
pub use session_validator::SessionValidator;
pub use user_repository::{FavoriteToggle, UserRepository};
