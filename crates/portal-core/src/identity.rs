use serde::{Deserialize, Serialize};

/// Provider-neutral record of the signed-in user.
///
/// Produced by an identity provider's current-user lookup and carried
/// verbatim inside a `Session`. Holds data only: no role, no token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable provider user ID (`sub` claim).
    pub user_id: String,
    /// Provider username. Often a UUID distinct from the email address.
    pub username: String,
    /// Email address, if the provider exposes one.
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    /// Human-facing label: email when known, else the username.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.username)
    }
}
