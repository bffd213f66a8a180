//! Survey answer service configuration.

use serde::{Deserialize, Serialize};

/// Default per-phase timeout in seconds.
const fn default_phase_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SurveyConfig {
    /// Base URL of the service exposing `/fixed-questions`, `/ask` and `/rate`.
    #[serde(default)]
    pub api_base_url: String,

    /// Upper bound for each answer phase. Expiry counts as a phase failure.
    #[serde(default = "default_phase_timeout_secs")]
    pub phase_timeout_secs: u64,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            phase_timeout_secs: default_phase_timeout_secs(),
        }
    }
}

impl SurveyConfig {
    /// Check if the survey service endpoint is set.
    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty()
    }

    /// Phase timeout as a `Duration`.
    pub const fn phase_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.phase_timeout_secs)
    }
}
