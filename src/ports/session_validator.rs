//! Session validation port for access token validation.
//!
//! The recipe core never authenticates; it only authorizes. This port is
//! how the HTTP layer turns a bearer token into an `AuthenticatedUser`
//! whose id is then passed explicitly into every mutating command.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, AuthenticatedUser};

/// Validates access tokens and extracts user identity.
///
/// # Contract
///
/// Implementations must:
/// - Validate the token signature and expiry
/// - Return `AuthError::InvalidToken` for malformed or badly signed tokens
/// - Return `AuthError::TokenExpired` for expired tokens
/// - Return `AuthError::ServiceUnavailable` for transient errors
#[async_trait]
pub trait SessionValidator: Send + Sync {
    /// Validate a raw token (without the "Bearer " prefix).
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::UserId;
    use std::collections::HashMap;

    struct FixedTokens {
        tokens: HashMap<String, AuthenticatedUser>,
    }

    #[async_trait]
    impl SessionValidator for FixedTokens {
        async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
            self.tokens.get(token).cloned().ok_or(AuthError::InvalidToken)
        }
    }

    fn validator() -> FixedTokens {
        let user = AuthenticatedUser::new(UserId::new("user-123").unwrap(), Some("cook".into()));
        FixedTokens {
            tokens: HashMap::from([("valid-token".to_string(), user)]),
        }
    }

    #[tokio::test]
    async fn returns_user_for_known_token() {
        let user = validator().validate("valid-token").await.unwrap();
        assert_eq!(user.id.as_str(), "user-123");
    }

    #[tokio::test]
    async fn rejects_unknown_token() {
        let result = validator().validate("nope").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn session_validator_trait_is_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn SessionValidator>();
    }
}
