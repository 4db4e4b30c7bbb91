//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `jwt` - HS256 shared-secret tokens
//! - `mock` - Fixed tokens for tests and local development

mod jwt;
mod mock;

pub use jwt::{Claims, JwtConfig, JwtSessionValidator};
pub use mock::MockSessionValidator;
