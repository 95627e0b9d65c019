//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Values use the `COURSELOOM` prefix with
//! `__` (double underscore) separating nested keys:
//!
//! - `COURSELOOM__SERVER__PORT=8080` -> `server.port = 8080`
//! - `COURSELOOM__DATABASE__URL=...` -> `database.url = ...`

mod auth;
mod database;
mod error;
mod payment;
mod server;

pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    pub database: DatabaseConfig,

    /// Authentication configuration (JWT)
    pub auth: AuthConfig,

    /// Payment configuration (Stripe)
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file first when present (development), then reads
    /// prefixed environment variables into typed sections.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("COURSELOOM")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.auth.validate()?;
        self.payment.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> AppConfig {
        AppConfig {
            server: ServerConfig::default(),
            database: DatabaseConfig {
                url: "postgres://localhost/courseloom".to_string(),
                max_connections: 5,
            },
            auth: AuthConfig {
                jwt_secret: "a-long-enough-development-secret".to_string(),
            },
            payment: PaymentConfig {
                stripe_api_key: "sk_test_abc".to_string(),
                stripe_webhook_secret: "whsec_abc".to_string(),
                checkout_success_url: "https://app.test/success".to_string(),
                checkout_cancel_url: "https://app.test/cancel".to_string(),
            },
        }
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn invalid_section_fails_validation() {
        let mut config = valid_config();
        config.payment.stripe_api_key = String::new();
        assert!(config.validate().is_err());
    }
}
