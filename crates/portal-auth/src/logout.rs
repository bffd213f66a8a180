use std::time::Duration;

use serde::Serialize;

use crate::provider::IdentityProvider;
use crate::store::SessionStore;

/// Where the logout page sends the user once it is done.
pub const AFTER_LOGOUT_PATH: &str = "/";

/// Sign-out sequencing for the logout page.
///
/// The page always navigates away after a fixed delay, even when the
/// provider rejects the sign-out, so the user is never left stuck on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogoutPolicy {
    pub success_delay: Duration,
    pub failure_delay: Duration,
}

impl Default for LogoutPolicy {
    fn default() -> Self {
        Self {
            success_delay: Duration::from_millis(500),
            failure_delay: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogoutOutcome {
    pub signed_out: bool,
    /// User-visible failure text, when the provider sign-out failed.
    pub error: Option<String>,
    pub redirect_to: &'static str,
    #[serde(serialize_with = "serialize_millis")]
    pub delay: Duration,
}

impl LogoutPolicy {
    #[must_use]
    pub const fn from_millis(success_ms: u64, failure_ms: u64) -> Self {
        Self {
            success_delay: Duration::from_millis(success_ms),
            failure_delay: Duration::from_millis(failure_ms),
        }
    }

    /// Clear the session, wait out the delay, and report where to go.
    pub async fn run<P: IdentityProvider>(&self, store: &SessionStore<P>) -> LogoutOutcome {
        let outcome = match store.clear().await {
            Ok(()) => LogoutOutcome {
                signed_out: true,
                error: None,
                redirect_to: AFTER_LOGOUT_PATH,
                delay: self.success_delay,
            },
            Err(error) => LogoutOutcome {
                signed_out: false,
                error: Some(format!("Error during logout: {error}")),
                redirect_to: AFTER_LOGOUT_PATH,
                delay: self.failure_delay,
            },
        };

        tokio::time::sleep(outcome.delay).await;
        tracing::info!(
            signed_out = outcome.signed_out,
            redirect_to = outcome.redirect_to,
            "logout finished"
        );
        outcome
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_millis<S: serde::Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u128(delay.as_millis())
}
