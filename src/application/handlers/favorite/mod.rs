//! Favorite command and query handlers.

mod list_favorites;
mod toggle_favorite;

pub use list_favorites::{ListFavoritesHandler, ListFavoritesQuery};
pub use toggle_favorite::{ToggleFavoriteCommand, ToggleFavoriteHandler};
