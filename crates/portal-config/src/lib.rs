//! # portal-config
//!
//! Layered configuration loading for the survey portal using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`PORTAL_*` prefix, `__` as separator)
//! 2. Project-level `.portal/config.toml`
//! 3. User-level `~/.config/portal/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `PORTAL_SURVEY__API_BASE_URL` -> `survey.api_base_url`,
//! `PORTAL_AUTH__LOGOUT_DELAY_MS` -> `auth.logout_delay_ms`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use portal_config::PortalConfig;
//!
//! let config = PortalConfig::load_with_dotenv().expect("config");
//! if config.survey.is_configured() {
//!     println!("Survey API: {}", config.survey.api_base_url);
//! }
//! ```

mod admin;
mod auth;
mod error;
mod general;
mod survey;

pub use admin::AdminConfig;
pub use auth::AuthConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;
pub use survey::SurveyConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable prefix for every config key.
pub const ENV_PREFIX: &str = "PORTAL_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub survey: SurveyConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl PortalConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Figment` if a source fails to parse, or
    /// `ConfigError::InvalidValue` if a loaded value is out of range.
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer extra providers.
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from(".portal/config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Reject values that would make the portal misbehave rather than fail.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.survey.phase_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "survey.phase_timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        if self.general.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "general.request_timeout_secs".into(),
                reason: "must be greater than zero".into(),
            });
        }
        for (field, url) in [
            ("survey.api_base_url", &self.survey.api_base_url),
            ("admin.api_base_url", &self.admin.api_base_url),
        ] {
            if !url.is_empty() && !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidValue {
                    field: field.into(),
                    reason: format!("expected an http(s) URL, got '{url}'"),
                });
            }
        }
        Ok(())
    }

    /// Survey section, or `NotConfigured` when the endpoint is missing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` if `survey.api_base_url` is empty.
    pub fn require_survey(&self) -> Result<&SurveyConfig, ConfigError> {
        if self.survey.is_configured() {
            Ok(&self.survey)
        } else {
            Err(ConfigError::NotConfigured {
                section: "survey".into(),
            })
        }
    }

    /// Admin section, or `NotConfigured` when the endpoint is missing.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotConfigured` if `admin.api_base_url` is empty.
    pub fn require_admin(&self) -> Result<&AdminConfig, ConfigError> {
        if self.admin.is_configured() {
            Ok(&self.admin)
        } else {
            Err(ConfigError::NotConfigured {
                section: "admin".into(),
            })
        }
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("portal").join("config.toml"))
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available), then falls back to
    /// the current directory. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace root
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
