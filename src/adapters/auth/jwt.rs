//! HS256 JWT adapter for the `SessionValidator` port.
//!
//! Tokens are signed with a shared secret. The `sub` claim is the user id;
//! `exp` is always required and checked, `iss` only when an issuer is
//! configured.

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, AuthenticatedUser, UserId};
use crate::ports::SessionValidator;

/// Settings for [`JwtSessionValidator`].
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: Secret<String>,
    pub issuer: Option<String>,
    /// Clock skew tolerated on `exp`, in seconds.
    pub leeway_secs: u64,
}

/// Claims read from an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

pub struct JwtSessionValidator {
    key: DecodingKey,
    validation: Validation,
}

impl JwtSessionValidator {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = config.leeway_secs;
        validation.validate_exp = true;
        match &config.issuer {
            Some(issuer) => {
                validation.set_issuer(&[issuer]);
                validation.set_required_spec_claims(&["exp", "sub", "iss"]);
            }
            None => validation.set_required_spec_claims(&["exp", "sub"]),
        }

        Self {
            key: DecodingKey::from_secret(config.secret.expose_secret().as_bytes()),
            validation,
        }
    }
}

#[async_trait]
impl SessionValidator for JwtSessionValidator {
    async fn validate(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidIssuer => {
                    tracing::warn!("Invalid issuer in token");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::warn!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            }
        })?;

        let claims = data.claims;
        let user_id = UserId::new(&claims.sub).map_err(|_| {
            tracing::warn!("Invalid user ID in token: {:?}", claims.sub);
            AuthError::InvalidToken
        })?;

        Ok(AuthenticatedUser::new(user_id, claims.username))
    }
}

impl std::fmt::Debug for JwtSessionValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSessionValidator")
            .field("issuer", &self.validation.iss)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-signing-secret";

    fn config(issuer: Option<&str>) -> JwtConfig {
        JwtConfig {
            secret: Secret::new(SECRET.to_string()),
            issuer: issuer.map(str::to_string),
            leeway_secs: 0,
        }
    }

    fn token(sub: &str, exp_offset: i64, iss: Option<&str>, secret: &str) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            exp: chrono::Utc::now().timestamp() + exp_offset,
            iss: iss.map(str::to_string),
            username: Some("cook".to_string()),
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn valid_token_yields_subject() {
        let validator = JwtSessionValidator::new(&config(None));
        let user = validator
            .validate(&token("user-1", 3600, None, SECRET))
            .await
            .unwrap();
        assert_eq!(user.id.as_str(), "user-1");
        assert_eq!(user.username.as_deref(), Some("cook"));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let validator = JwtSessionValidator::new(&config(None));
        let result = validator.validate(&token("user-1", -3600, None, SECRET)).await;
        assert_eq!(result, Err(AuthError::TokenExpired));
    }

    #[tokio::test]
    async fn wrong_signature_is_invalid() {
        let validator = JwtSessionValidator::new(&config(None));
        let result = validator
            .validate(&token("user-1", 3600, None, "another-secret"))
            .await;
        assert_eq!(result, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn issuer_is_enforced_when_configured() {
        let validator = JwtSessionValidator::new(&config(Some("recipe-share")));
        let good = token("user-1", 3600, Some("recipe-share"), SECRET);
        let bad = token("user-1", 3600, Some("elsewhere"), SECRET);

        assert!(validator.validate(&good).await.is_ok());
        assert_eq!(validator.validate(&bad).await, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn blank_subject_is_invalid() {
        let validator = JwtSessionValidator::new(&config(None));
        let result = validator.validate(&token("  ", 3600, None, SECRET)).await;
        assert_eq!(result, Err(AuthError::InvalidToken));
    }

    #[tokio::test]
    async fn garbage_is_invalid() {
        let validator = JwtSessionValidator::new(&config(None));
        assert_eq!(
            validator.validate("not-a-jwt").await,
            Err(AuthError::InvalidToken)
        );
    }
}
