use chrono::Utc;
use portal_core::Identity;

use crate::claims::IdToken;
use crate::error::AuthError;
use crate::provider::{IdentityProvider, ProviderSession, SignOutOptions};
use crate::token_store::TokenStore;

/// Identity provider backed by an ID token saved with `portal auth login`.
///
/// The hosted provider has already authenticated the user and issued the
/// token; this type only reads it back. Signing out forgets the token.
#[derive(Debug, Clone)]
pub struct TokenIdentityProvider {
    store: TokenStore,
}

impl TokenIdentityProvider {
    #[must_use]
    pub const fn new(store: TokenStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub const fn store(&self) -> &TokenStore {
        &self.store
    }

    /// The stored token, decoded and checked for expiry.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` when nothing is stored, `TokenDecode` for a
    /// malformed token, `TokenExpired` once `exp` has passed.
    pub fn id_token(&self) -> Result<IdToken, AuthError> {
        let raw = self.store.load().ok_or(AuthError::NotAuthenticated)?;
        let token = IdToken::decode(&raw)?;
        if token.is_expired_at(Utc::now()) {
            return Err(AuthError::TokenExpired);
        }
        Ok(token)
    }
}

fn identity_from(token: &IdToken) -> Result<Identity, AuthError> {
    let user_id = token
        .claim_str("sub")
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AuthError::TokenDecode("missing 'sub' claim".into()))?;
    let username = token
        .claim_str("cognito:username")
        .filter(|s| !s.is_empty())
        .unwrap_or(user_id);
    Ok(Identity {
        user_id: user_id.to_string(),
        username: username.to_string(),
        email: token.claim_str("email").map(str::to_string),
    })
}

impl IdentityProvider for TokenIdentityProvider {
    async fn current_identity(&self) -> Result<Identity, AuthError> {
        identity_from(&self.id_token()?)
    }

    async fn session(&self) -> Result<ProviderSession, AuthError> {
        Ok(ProviderSession {
            id_token: Some(self.id_token()?),
        })
    }

    async fn sign_out(&self, options: SignOutOptions) -> Result<(), AuthError> {
        tracing::debug!(global = options.global, "forgetting stored ID token");
        self.store
            .delete()
            .map_err(|e| AuthError::SignOutFailed(e.to_string()))
    }
}
