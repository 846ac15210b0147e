//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Upper bound for `max_text_length`.
pub const MAX_TEXT_LENGTH_LIMIT: usize = 10_000;

/// Upper bound for `session_ttl_secs` (one year).
pub const MAX_SESSION_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_text_length` is 0 or exceeds 10000
    /// - `session_ttl_secs` is 0 or exceeds one year
    /// - `bind_addr` is empty
    /// - `jwt_secret` is set but shorter than 16 bytes
    /// - a `cors_origins` entry is not an `http(s)://` origin
    ///
    /// Returns `ConfigError::Missing` if only one of `admin_email` and
    /// `admin_password` is set.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_text_length == 0 {
            return Err(ConfigError::Invalid {
                field: "max_text_length".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.max_text_length > MAX_TEXT_LENGTH_LIMIT {
            return Err(ConfigError::Invalid {
                field: "max_text_length".into(),
                reason: format!("must not exceed {MAX_TEXT_LENGTH_LIMIT}"),
            });
        }

        if self.session_ttl_secs == 0 {
            return Err(ConfigError::Invalid {
                field: "session_ttl_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }
        if self.session_ttl_secs > MAX_SESSION_TTL_SECS {
            return Err(ConfigError::Invalid {
                field: "session_ttl_secs".into(),
                reason: "must not exceed one year".into(),
            });
        }

        if self.bind_addr.trim().is_empty() {
            return Err(ConfigError::Invalid { field: "bind_addr".into(), reason: "must not be empty".into() });
        }

        if let Some(secret) = &self.jwt_secret
            && secret.len() < 16
        {
            return Err(ConfigError::Invalid {
                field: "jwt_secret".into(),
                reason: "must be at least 16 bytes".into(),
            });
        }

        if let Some(origin) = self
            .cors_origins
            .iter()
            .find(|o| !(o.starts_with("http://") || o.starts_with("https://")) || o.ends_with('/'))
        {
            return Err(ConfigError::Invalid {
                field: "cors_origins".into(),
                reason: format!("{origin:?} is not an origin like https://example.com"),
            });
        }

        match (&self.admin_email, &self.admin_password) {
            (Some(_), None) => {
                return Err(ConfigError::Missing {
                    field: "admin_password".into(),
                    hint: "Set POSTBOARD_ADMIN_PASSWORD alongside POSTBOARD_ADMIN_EMAIL".into(),
                });
            }
            (None, Some(_)) => {
                return Err(ConfigError::Missing {
                    field: "admin_email".into(),
                    hint: "Set POSTBOARD_ADMIN_EMAIL alongside POSTBOARD_ADMIN_PASSWORD".into(),
                });
            }
            _ => {}
        }

        if self.jwt_secret.is_none() {
            tracing::warn!("jwt_secret not set; admin sessions will not survive a restart");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_text_length_zero() {
        let config = AppConfig { max_text_length: 0, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_text_length"));
    }

    #[test]
    fn test_validate_max_text_length_exceeds_limit() {
        let config = AppConfig { max_text_length: MAX_TEXT_LENGTH_LIMIT + 1, ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "max_text_length"));
    }

    #[test]
    fn test_validate_session_ttl_bounds() {
        let config = AppConfig { session_ttl_secs: 0, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "session_ttl_secs"));

        let config = AppConfig { session_ttl_secs: MAX_SESSION_TTL_SECS + 1, ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "session_ttl_secs"));
    }

    #[test]
    fn test_validate_empty_bind_addr() {
        let config = AppConfig { bind_addr: " ".into(), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "bind_addr"));
    }

    #[test]
    fn test_validate_short_jwt_secret() {
        let config = AppConfig { jwt_secret: Some("short".into()), ..Default::default() };
        let result = config.validate();
        assert!(matches!(result, Err(ConfigError::Invalid { field, .. }) if field == "jwt_secret"));
    }

    #[test]
    fn test_validate_cors_origins() {
        for bad in ["*", "board.example.com", "https://board.example.com/"] {
            let config = AppConfig { cors_origins: vec![bad.into()], ..Default::default() };
            assert!(matches!(config.validate(), Err(ConfigError::Invalid { field, .. }) if field == "cors_origins"));
        }

        let config = AppConfig { cors_origins: vec!["http://localhost:5173".into()], ..Default::default() };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_half_admin_credentials() {
        let config = AppConfig { admin_email: Some("root@example.com".into()), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Missing { field, .. }) if field == "admin_password"));

        let config = AppConfig { admin_password: Some("secret".into()), ..Default::default() };
        assert!(matches!(config.validate(), Err(ConfigError::Missing { field, .. }) if field == "admin_email"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig {
            max_text_length: MAX_TEXT_LENGTH_LIMIT,
            session_ttl_secs: MAX_SESSION_TTL_SECS,
            jwt_secret: Some("0123456789abcdef".into()),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
