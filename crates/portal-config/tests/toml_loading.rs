//! Integration tests for TOML configuration loading.
//!
//! Uses `figment::Jail` for sandboxed cwd, files and env vars.

use figment::{
    Figment, Jail,
    providers::{Env, Format, Serialized, Toml},
};
use pretty_assertions::assert_eq;
use portal_config::{ConfigError, PortalConfig};

#[test]
fn loads_survey_config_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[survey]
api_base_url = "https://survey.example.org"
phase_timeout_secs = 12
"#,
        )?;

        let config: PortalConfig = Figment::from(Serialized::defaults(PortalConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.survey.api_base_url, "https://survey.example.org");
        assert_eq!(config.survey.phase_timeout_secs, 12);
        assert!(config.survey.is_configured());
        // Untouched sections keep their defaults
        assert_eq!(config.auth.logout_failure_delay_ms, 1000);
        Ok(())
    });
}

#[test]
fn project_local_file_is_picked_up() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".portal"))
            .map_err(|e| e.to_string())?;
        jail.create_file(
            ".portal/config.toml",
            r#"
[admin]
api_base_url = "https://users.example.org"

[auth]
keyring_service = "portal-test"
"#,
        )?;

        let config = PortalConfig::load().map_err(|e| e.to_string())?;
        assert_eq!(config.admin.api_base_url, "https://users.example.org");
        assert_eq!(config.auth.keyring_service, "portal-test");
        Ok(())
    });
}

#[test]
fn env_var_overrides_project_toml() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".portal"))
            .map_err(|e| e.to_string())?;
        jail.create_file(
            ".portal/config.toml",
            r#"
[survey]
api_base_url = "https://from-toml.example.org"
phase_timeout_secs = 5
"#,
        )?;
        jail.set_env("PORTAL_SURVEY__API_BASE_URL", "https://from-env.example.org");

        let config = PortalConfig::load().map_err(|e| e.to_string())?;
        // Env should win over TOML
        assert_eq!(config.survey.api_base_url, "https://from-env.example.org");
        // TOML value not overridden by env should remain
        assert_eq!(config.survey.phase_timeout_secs, 5);
        Ok(())
    });
}

#[test]
fn full_env_provider_chain() {
    Jail::expect_with(|jail| {
        jail.set_env("PORTAL_SURVEY__API_BASE_URL", "https://jail.example.org");
        jail.set_env("PORTAL_SURVEY__PHASE_TIMEOUT_SECS", "7");
        jail.set_env("PORTAL_ADMIN__API_BASE_URL", "https://jail-users.example.org");
        jail.set_env("PORTAL_AUTH__LOGOUT_DELAY_MS", "50");
        jail.set_env("PORTAL_GENERAL__USER_AGENT", "jail-agent");

        let config: PortalConfig = Figment::from(Serialized::defaults(PortalConfig::default()))
            .merge(Env::prefixed("PORTAL_").split("__"))
            .extract()?;

        assert_eq!(config.survey.api_base_url, "https://jail.example.org");
        assert_eq!(config.survey.phase_timeout_secs, 7);
        assert_eq!(config.admin.api_base_url, "https://jail-users.example.org");
        assert_eq!(config.auth.logout_delay_ms, 50);
        assert_eq!(config.general.user_agent, "jail-agent");
        Ok(())
    });
}

/// Typo'd env var keys are silently ignored by figment.
#[test]
fn typo_env_var_silently_ignored() {
    Jail::expect_with(|jail| {
        jail.set_env("PORTAL_SURVEY__API_BASE_URLL", "https://typo.example.org");

        let config = PortalConfig::load().map_err(|e| e.to_string())?;
        assert!(config.survey.api_base_url.is_empty());
        Ok(())
    });
}

#[test]
fn load_rejects_zero_timeout_from_env() {
    Jail::expect_with(|jail| {
        jail.set_env("PORTAL_SURVEY__PHASE_TIMEOUT_SECS", "0");

        let err = PortalConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
        Ok(())
    });
}

#[test]
fn malformed_toml_surfaces_figment_error() {
    Jail::expect_with(|jail| {
        std::fs::create_dir_all(jail.directory().join(".portal"))
            .map_err(|e| e.to_string())?;
        jail.create_file(".portal/config.toml", "[survey\napi_base_url = ")?;

        let err = PortalConfig::load().unwrap_err();
        assert!(matches!(err, ConfigError::Figment(_)));
        Ok(())
    });
}
