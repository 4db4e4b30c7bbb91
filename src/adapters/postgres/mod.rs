//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresRecipeRepository` - Recipe writes, atomic view and rating updates
//! - `PostgresRecipeReader` - Listing plans rendered to SQL
//! - `PostgresUserRepository` - Favorite toggles and created-recipe counters

mod recipe_reader;
mod recipe_repository;
mod rows;
mod user_repository;

pub use recipe_reader::PostgresRecipeReader;
pub use recipe_repository::PostgresRecipeRepository;
pub use user_repository::PostgresUserRepository;
