//! In-memory adapters.
//!
//! - `InMemoryStore` - Implements `RecipeRepository`, `RecipeReader` and
//!   `UserRepository` over a single lock

mod in_memory_store;

pub use in_memory_store::InMemoryStore;
