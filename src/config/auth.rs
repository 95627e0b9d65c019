//! Authentication configuration.

use serde::Deserialize;

use super::error::ValidationError;

const MIN_JWT_SECRET_LEN: usize = 16;

/// JWT validation configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret shared with the identity provider.
    pub jwt_secret: String,
}

impl AuthConfig {
    /// Validate auth configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.jwt_secret.is_empty() {
            return Err(ValidationError::MissingRequired("AUTH__JWT_SECRET"));
        }
        if self.jwt_secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ValidationError::WeakJwtSecret {
                min: MIN_JWT_SECRET_LEN,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_secret_is_valid() {
        let config = AuthConfig {
            jwt_secret: "0123456789abcdef0123".to_string(),
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn short_secret_is_rejected() {
        let config = AuthConfig {
            jwt_secret: "short".to_string(),
        };
        assert!(matches!(
            config.validate(),
            Err(ValidationError::WeakJwtSecret { .. })
        ));
    }
}
