//! User-management API configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AdminConfig {
    /// Base URL of the service exposing `/users` and `/users/{id}/role`.
    #[serde(default)]
    pub api_base_url: String,
}

impl AdminConfig {
    pub fn is_configured(&self) -> bool {
        !self.api_base_url.is_empty()
    }
}
