use std::future::Future;

use portal_core::Identity;

use crate::claims::IdToken;
use crate::error::AuthError;

/// What the provider reports about the active session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderSession {
    /// ID token for the signed-in user. `None` when the provider holds a
    /// session but issued no ID token.
    pub id_token: Option<IdToken>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignOutOptions {
    /// Revoke every session of the user, not only this device's.
    pub global: bool,
}

impl Default for SignOutOptions {
    fn default() -> Self {
        Self { global: true }
    }
}

/// The identity provider surface the session engine consumes.
///
/// Token issuance, password checks, MFA and redirect mechanics stay behind
/// this boundary.
pub trait IdentityProvider: Send + Sync {
    /// The currently signed-in user. Errors mean "nobody is signed in".
    fn current_identity(&self) -> impl Future<Output = Result<Identity, AuthError>> + Send;

    /// Session details, including the ID token the role is derived from.
    fn session(&self) -> impl Future<Output = Result<ProviderSession, AuthError>> + Send;

    fn sign_out(
        &self,
        options: SignOutOptions,
    ) -> impl Future<Output = Result<(), AuthError>> + Send;
}
