//! HTTP adapter for user-scoped endpoints: favorites and own recipes.

mod dto;
mod handlers;
mod routes;

pub use dto::FavoriteToggleResponse;
pub use handlers::UserHandlers;
pub use routes::user_routes;
