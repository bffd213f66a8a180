//! Identity session and logout configuration.

use serde::{Deserialize, Serialize};

fn default_keyring_service() -> String {
    "survey-portal".to_string()
}

/// Delay before leaving the logout page after a successful sign-out.
const fn default_logout_delay_ms() -> u64 {
    500
}

/// Delay before leaving the logout page after a failed sign-out.
const fn default_logout_failure_delay_ms() -> u64 {
    1000
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// OS keychain service name holding the stored ID token.
    #[serde(default = "default_keyring_service")]
    pub keyring_service: String,

    #[serde(default = "default_logout_delay_ms")]
    pub logout_delay_ms: u64,

    #[serde(default = "default_logout_failure_delay_ms")]
    pub logout_failure_delay_ms: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            keyring_service: default_keyring_service(),
            logout_delay_ms: default_logout_delay_ms(),
            logout_failure_delay_ms: default_logout_failure_delay_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = AuthConfig::default();
        assert_eq!(config.keyring_service, "survey-portal");
        assert_eq!(config.logout_delay_ms, 500);
        assert_eq!(config.logout_failure_delay_ms, 1000);
    }
}
