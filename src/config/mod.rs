//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `RECIPE_SHARE`
//! prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use recipe_share::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod auth;
mod database;
mod error;
mod listing;
mod server;

pub use auth::AuthConfig;
pub use database::{DatabaseConfig, PoolConfig, MAX_POOL_SIZE};
pub use error::{ConfigError, ValidationError};
pub use listing::ListingConfig;
pub use server::{Environment, LogFormat, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Authentication configuration (JWT validation)
    pub auth: AuthConfig,

    /// Listing page sizes
    #[serde(default)]
    pub listing: ListingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `RECIPE_SHARE` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// - `RECIPE_SHARE__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `RECIPE_SHARE__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or values
    /// cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("RECIPE_SHARE")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.listing.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn set_minimal_env() {
        env::set_var("RECIPE_SHARE__DATABASE__URL", "postgresql://test@localhost/test");
        env::set_var("RECIPE_SHARE__AUTH__JWT_SECRET", "dev-secret");
    }

    fn clear_env() {
        for key in [
            "RECIPE_SHARE__DATABASE__URL",
            "RECIPE_SHARE__AUTH__JWT_SECRET",
            "RECIPE_SHARE__SERVER__PORT",
            "RECIPE_SHARE__SERVER__ENVIRONMENT",
            "RECIPE_SHARE__LISTING__MAX_PAGE_SIZE",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(
            config.database.url.expose_secret(),
            "postgresql://test@localhost/test"
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.environment, Environment::Development);
        assert_eq!(config.listing.default_page_size, 12);
        assert_eq!(config.listing.max_page_size, 100);
    }

    #[test]
    fn test_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        env::set_var("RECIPE_SHARE__SERVER__PORT", "3000");
        env::set_var("RECIPE_SHARE__SERVER__ENVIRONMENT", "production");
        env::set_var("RECIPE_SHARE__LISTING__MAX_PAGE_SIZE", "50");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
        assert!(config.is_production());
        assert_eq!(config.listing.max_page_size, 50);
        // dev-secret is too short for production
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_database_fails_to_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("RECIPE_SHARE__AUTH__JWT_SECRET", "dev-secret");
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_err());
    }
}
