//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, the authenticated actor and the error
//! vocabulary shared by every other module.

mod auth;
mod errors;
mod ids;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{RecipeId, UserId};
pub use timestamp::Timestamp;
