//! Role resolution from token claims.
//!
//! Precedence, first match wins:
//!
//! 1. provider group membership (`cognito:groups`), first entry
//! 2. custom attribute (`custom:role`)
//! 3. generic `role` claim
//! 4. `survey-taker`
//!
//! Values are not checked against the known roles. An unknown string becomes
//! `Role::Other` and is turned away by the access guard, which sends the user
//! to the survey area.

use portal_core::Role;

use crate::claims::RoleClaims;
use crate::provider::ProviderSession;

/// Derive the single authoritative role for a set of claims.
#[must_use]
pub fn resolve(claims: &RoleClaims) -> Role {
    if let Some(group) = claims.groups.as_deref().and_then(<[String]>::first) {
        return Role::from(group.as_str());
    }
    if let Some(custom) = claims.custom_role.as_deref() {
        return Role::from(custom);
    }
    if let Some(role) = claims.role.as_deref() {
        return Role::from(role);
    }
    Role::DEFAULT
}

/// Role for a provider session. A session without an ID token gets the default.
#[must_use]
pub fn resolve_session(session: &ProviderSession) -> Role {
    session
        .id_token
        .as_ref()
        .map_or(Role::DEFAULT, |token| resolve(&token.role_claims()))
}
