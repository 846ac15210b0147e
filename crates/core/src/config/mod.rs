//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (POSTBOARD_*)
//! 2. TOML config file (if POSTBOARD_CONFIG_FILE set)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::{ConfigError, MAX_SESSION_TTL_SECS, MAX_TEXT_LENGTH_LIMIT};

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (POSTBOARD_*)
/// 2. TOML config file (if POSTBOARD_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite database.
    ///
    /// Set via POSTBOARD_DB_PATH environment variable.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Address the HTTP server binds to.
    ///
    /// Set via POSTBOARD_BIND_ADDR environment variable.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Maximum post length in characters.
    ///
    /// Set via POSTBOARD_MAX_TEXT_LENGTH environment variable.
    #[serde(default = "default_max_text_length")]
    pub max_text_length: usize,

    /// Secret for signing admin sessions.
    ///
    /// Set via POSTBOARD_JWT_SECRET. When unset a random secret is
    /// generated at startup and sessions do not survive a restart.
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Admin session lifetime in seconds.
    ///
    /// Set via POSTBOARD_SESSION_TTL_SECS environment variable.
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,

    /// Email of the admin created on first start.
    ///
    /// Set via POSTBOARD_ADMIN_EMAIL environment variable.
    #[serde(default)]
    pub admin_email: Option<String>,

    /// Password of the admin created on first start.
    ///
    /// Set via POSTBOARD_ADMIN_PASSWORD environment variable.
    #[serde(default)]
    pub admin_password: Option<String>,

    /// Seconds between retention sweeps; 0 disables the sweep.
    ///
    /// Set via POSTBOARD_SWEEP_INTERVAL_SECS environment variable.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,

    /// Frontend origins allowed to call the API cross-origin, with cookies.
    ///
    /// Set via POSTBOARD_CORS_ORIGINS, e.g. `["https://board.example.com"]`.
    /// Empty means same-origin only.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./postboard.sqlite")
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".into()
}

fn default_max_text_length() -> usize {
    280
}

fn default_session_ttl_secs() -> u64 {
    86_400
}

fn default_sweep_interval_secs() -> u64 {
    3_600
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            bind_addr: default_bind_addr(),
            max_text_length: default_max_text_length(),
            jwt_secret: None,
            session_ttl_secs: default_session_ttl_secs(),
            admin_email: None,
            admin_password: None,
            sweep_interval_secs: default_sweep_interval_secs(),
            cors_origins: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Session lifetime as a chrono Duration for signing.
    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_ttl_secs.min(MAX_SESSION_TTL_SECS) as i64)
    }

    /// Sweep period, or None when the sweep is disabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }

    /// Initial admin credentials, when both are configured.
    pub fn admin_credentials(&self) -> Option<(&str, &str)> {
        match (&self.admin_email, &self.admin_password) {
            (Some(email), Some(password)) => Some((email.as_str(), password.as_str())),
            _ => None,
        }
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `POSTBOARD_`
    /// 2. TOML file from `POSTBOARD_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("POSTBOARD_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("POSTBOARD_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }
}
