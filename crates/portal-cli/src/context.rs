use std::sync::Arc;

use portal_auth::{LogoutPolicy, SessionStore, TokenIdentityProvider, TokenStore};
use portal_config::PortalConfig;

/// Shared state handed to every command.
pub struct AppContext {
    pub config: PortalConfig,
    pub store: SessionStore<TokenIdentityProvider>,
}

impl AppContext {
    pub fn init(config: PortalConfig) -> Self {
        let tokens = TokenStore::new(config.auth.keyring_service.clone());
        let store = SessionStore::new(Arc::new(TokenIdentityProvider::new(tokens)));
        Self { config, store }
    }

    pub fn tokens(&self) -> &TokenStore {
        self.store.provider().store()
    }

    pub const fn logout_policy(&self) -> LogoutPolicy {
        LogoutPolicy::from_millis(
            self.config.auth.logout_delay_ms,
            self.config.auth.logout_failure_delay_ms,
        )
    }
}

/// Log which optional backends are missing so commands that need them fail
/// with a clear message.
pub fn warn_unconfigured(config: &PortalConfig) {
    if !config.survey.is_configured() {
        tracing::debug!("survey backend not configured (PORTAL_SURVEY__API_BASE_URL)");
    }
    if !config.admin.is_configured() {
        tracing::debug!("user directory not configured (PORTAL_ADMIN__API_BASE_URL)");
    }
}
