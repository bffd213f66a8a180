use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::AuthError;

/// Provider-managed group membership claim.
pub const GROUPS_CLAIM: &str = "cognito:groups";
/// Self-service custom attribute claim.
pub const CUSTOM_ROLE_CLAIM: &str = "custom:role";
/// Generic role claim.
pub const ROLE_CLAIM: &str = "role";

/// The role-bearing subset of an ID token's claims.
///
/// Every field is optional. A claim of the wrong JSON type, or an empty
/// string, is treated as absent so that malformed payloads fall through to
/// the next source instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleClaims {
    pub groups: Option<Vec<String>>,
    pub custom_role: Option<String>,
    pub role: Option<String>,
}

impl RoleClaims {
    /// Extract role claims from a decoded token payload.
    #[must_use]
    pub fn from_payload(payload: &Value) -> Self {
        let groups = payload.get(GROUPS_CLAIM).and_then(Value::as_array).map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect::<Vec<_>>()
        });

        Self {
            groups,
            custom_role: non_empty_str(payload, CUSTOM_ROLE_CLAIM),
            role: non_empty_str(payload, ROLE_CLAIM),
        }
    }
}

fn non_empty_str(payload: &Value, key: &str) -> Option<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// A decoded (but not verified) ID token.
///
/// Signature verification belongs to the identity provider; the portal only
/// reads claims from tokens the provider already handed out.
#[derive(Debug, Clone, PartialEq)]
pub struct IdToken {
    raw: String,
    payload: Value,
}

impl IdToken {
    /// Decode the payload segment of a compact JWT.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::TokenDecode` if the token is not three dot-separated
    /// segments, the payload is not base64url, or it is not a JSON object.
    pub fn decode(raw: &str) -> Result<Self, AuthError> {
        let raw = raw.trim();
        let parts: Vec<&str> = raw.split('.').collect();
        if parts.len() != 3 {
            return Err(AuthError::TokenDecode("invalid JWT format".into()));
        }
        let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
            .decode(parts[1].trim_end_matches('='))
            .map_err(|e| AuthError::TokenDecode(format!("base64 decode failed: {e}")))?;
        let payload: Value = serde_json::from_slice(&bytes)
            .map_err(|e| AuthError::TokenDecode(format!("JSON parse failed: {e}")))?;
        if !payload.is_object() {
            return Err(AuthError::TokenDecode("payload is not a JSON object".into()));
        }
        Ok(Self {
            raw: raw.to_string(),
            payload,
        })
    }

    /// The compact token, suitable for a `Bearer` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    #[must_use]
    pub const fn payload(&self) -> &Value {
        &self.payload
    }

    #[must_use]
    pub fn role_claims(&self) -> RoleClaims {
        RoleClaims::from_payload(&self.payload)
    }

    /// String claim lookup.
    #[must_use]
    pub fn claim_str(&self, key: &str) -> Option<&str> {
        self.payload.get(key).and_then(Value::as_str)
    }

    /// Expiry from the `exp` claim, if present and representable.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.payload
            .get("exp")
            .and_then(Value::as_i64)
            .and_then(|exp| DateTime::from_timestamp(exp, 0))
    }

    /// Whether `exp` is at or before `now`. Tokens without `exp` never expire here.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }
}
