//! Identity asserted by the authentication collaborator.
//!
//! The core never authenticates; it only receives an already-verified actor
//! and authorizes by comparing it with a recipe's author. These types carry
//! no provider dependencies: any token scheme can populate them through the
//! `SessionValidator` port.

use super::UserId;
use thiserror::Error;

/// Actor extracted from a validated access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Stable user identifier (token subject).
    pub id: UserId,

    /// Username claim, when the issuer provides one.
    pub username: Option<String>,
}

impl AuthenticatedUser {
    /// Creates a new authenticated user.
    pub fn new(id: UserId, username: Option<String>) -> Self {
        Self { id, username }
    }
}

/// Errors raised while validating an access token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token signature is valid but it has expired.
    #[error("Token expired")]
    TokenExpired,

    /// The validator could not reach its backing service.
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }
}
