//! Role-based access decisions.
//!
//! Decisions are pure functions of the session passed in. Callers evaluate
//! them on every navigation; nothing here caches a previous answer.

use portal_core::Role;
use serde::Serialize;

use crate::session::{Session, SessionSnapshot};

pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_HOME: &str = "/admin/dashboard";
pub const RESEARCHER_HOME: &str = "/researcher/dashboard";
pub const SURVEY_HOME: &str = "/survey";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", content = "target", rename_all = "snake_case")]
pub enum AccessDecision {
    Render,
    RedirectLogin,
    /// Authenticated but not allowed here: go to the role's own home.
    RedirectHome(&'static str),
}

/// Outcome when the store may still be loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// A refresh is in flight; show a neutral pending state.
    Pending,
    Decided(AccessDecision),
}

/// Landing path for a role. Unrecognized roles land in the survey area.
#[must_use]
pub const fn home_path(role: &Role) -> &'static str {
    match role {
        Role::Admin => ADMIN_HOME,
        Role::Researcher => RESEARCHER_HOME,
        Role::SurveyTaker | Role::Other(_) => SURVEY_HOME,
    }
}

/// Decide whether `session` may render a view requiring `required`.
///
/// Must not be called while the store is loading; use [`evaluate`] when the
/// caller holds a snapshot.
#[must_use]
pub fn decide(session: &Session, required: Option<&Role>) -> AccessDecision {
    let Session::Authenticated { role, .. } = session else {
        return AccessDecision::RedirectLogin;
    };
    match required {
        Some(required) if required != role => AccessDecision::RedirectHome(home_path(role)),
        _ => AccessDecision::Render,
    }
}

/// [`decide`], but yields `Pending` while the snapshot is loading.
#[must_use]
pub fn evaluate(snapshot: &SessionSnapshot, required: Option<&Role>) -> GuardOutcome {
    if snapshot.is_loading {
        return GuardOutcome::Pending;
    }
    GuardOutcome::Decided(decide(&snapshot.session, required))
}
