//! General application configuration.

use serde::{Deserialize, Serialize};

fn default_user_agent() -> String {
    "survey-portal/0.1".to_string()
}

/// Default whole-request timeout for HTTP clients.
const fn default_request_timeout_secs() -> u64 {
    10
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// `User-Agent` header sent by every HTTP client.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Timeout applied to non-phase requests (question listing, rating, users).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl GeneralConfig {
    pub const fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout_secs)
    }
}
