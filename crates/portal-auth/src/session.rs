use portal_core::{Identity, Role};
use serde::Serialize;

/// Who is logged in and with what authority.
///
/// Replaced wholesale on every refresh. An authenticated session always
/// carries exactly one role; an anonymous one carries none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Session {
    Anonymous,
    Authenticated { identity: Identity, role: Role },
}

impl Session {
    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated { .. })
    }

    #[must_use]
    pub const fn role(&self) -> Option<&Role> {
        match self {
            Self::Authenticated { role, .. } => Some(role),
            Self::Anonymous => None,
        }
    }

    #[must_use]
    pub const fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Authenticated { identity, .. } => Some(identity),
            Self::Anonymous => None,
        }
    }
}

/// The store's observable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub session: Session,
    /// True while a refresh is in flight (and before the first one finishes).
    /// Consumers must show a neutral pending state instead of deciding.
    pub is_loading: bool,
}

impl SessionSnapshot {
    /// State before the first refresh completes.
    #[must_use]
    pub const fn initial() -> Self {
        Self {
            session: Session::Anonymous,
            is_loading: true,
        }
    }

    #[must_use]
    pub const fn settled(session: Session) -> Self {
        Self {
            session,
            is_loading: false,
        }
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_has_no_role() {
        let session = Session::Anonymous;
        assert!(!session.is_authenticated());
        assert!(session.role().is_none());
        assert!(session.identity().is_none());
    }

    #[test]
    fn serializes_with_status_tag() {
        let session = Session::Authenticated {
            identity: Identity {
                user_id: "u1".into(),
                username: "u1".into(),
                email: None,
            },
            role: Role::Admin,
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["status"], "authenticated");
        assert_eq!(json["role"], "admin");
        assert_eq!(
            serde_json::to_value(Session::Anonymous).unwrap()["status"],
            "anonymous"
        );
    }

    #[test]
    fn initial_snapshot_is_loading() {
        let snapshot = SessionSnapshot::initial();
        assert!(snapshot.is_loading);
        assert!(!snapshot.is_authenticated());
    }
}
