use std::env;

use crate::config::errors::ConfigError;

/// Token lifetime is fixed at 24 hours; there is no refresh mechanism.
pub const TOKEN_LIFETIME_SECONDS: i64 = 24 * 60 * 60;

/// Signing policy for bearer tokens, loaded once at startup and injected
/// into the token service. Never mutated at runtime.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    /// Symmetric HS256 signing secret
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Issuer/audience validation can be disabled per deployment policy
    pub validate_issuer: bool,
    pub validate_audience: bool,
}

impl JwtSettings {
    /// Load JWT settings from environment variables.
    ///
    /// A missing or empty `JWT_SECRET` is a fatal misconfiguration: the
    /// process must refuse to start rather than degrade to per-request
    /// failures.
    pub fn from_env() -> Result<Self, ConfigError> {
        let secret = env::var("JWT_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingSetting("JWT_SECRET".to_string()))?;

        let issuer = env::var("JWT_ISSUER").unwrap_or_else(|_| "medequip-backend".to_string());
        let audience = env::var("JWT_AUDIENCE").unwrap_or_else(|_| "medequip-client".to_string());

        let validate_issuer = parse_bool("JWT_VALIDATE_ISSUER")?;
        let validate_audience = parse_bool("JWT_VALIDATE_AUDIENCE")?;

        Ok(Self {
            secret,
            issuer,
            audience,
            validate_issuer,
            validate_audience,
        })
    }

    /// Construct settings directly; used by tests
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: "medequip-backend".to_string(),
            audience: "medequip-client".to_string(),
            validate_issuer: false,
            validate_audience: false,
        }
    }
}

fn parse_bool(name: &str) -> Result<bool, ConfigError> {
    match env::var(name) {
        Err(_) => Ok(false),
        Ok(v) => match v.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" | "" => Ok(false),
            other => Err(ConfigError::InvalidSetting {
                name: name.to_string(),
                reason: format!("expected a boolean, got '{}'", other),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test because JWT_SECRET is process-global state
    #[test]
    fn test_missing_or_empty_secret_is_a_config_error() {
        unsafe {
            std::env::remove_var("JWT_SECRET");
        }
        let result = JwtSettings::from_env();
        assert!(matches!(result, Err(ConfigError::MissingSetting(_))));

        unsafe {
            std::env::set_var("JWT_SECRET", "");
        }
        let result = JwtSettings::from_env();
        assert!(matches!(result, Err(ConfigError::MissingSetting(_))));

        unsafe {
            std::env::remove_var("JWT_SECRET");
        }
    }
}
