//! Gateway configuration.

use std::env;

use common::{JwtConfig, ServiceConfig};
use domain::MIN_JWT_SECRET_LENGTH;

/// Gateway configuration.
#[derive(Debug, Clone, Default)]
pub struct GatewayConfig {
    pub server: ServiceConfig,
    pub jwt: JwtConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = ServiceConfig::default();

        Self {
            server: ServiceConfig {
                service_name: env::var("SERVICE_NAME").unwrap_or(defaults.service_name),
                host: env::var("SERVER_HOST").unwrap_or(defaults.host),
                port: env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(defaults.port),
            },
            jwt: JwtConfig {
                secret: env::var("JWT_SECRET").unwrap_or_default(),
            },
        }
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<(), String> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(format!(
                "JWT_SECRET must be at least {} characters",
                MIN_JWT_SECRET_LENGTH
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_secret_is_rejected() {
        let mut config = GatewayConfig::default();
        assert!(config.validate().is_err());

        config.jwt.secret = "x".repeat(MIN_JWT_SECRET_LENGTH);
        assert!(config.validate().is_ok());
    }
}
