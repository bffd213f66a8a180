//! The portal's route table.
//!
//! ```text
//! /                       → /login
//! /login                  login page, or the role's home when signed in
//! /admin/*       (admin)  dashboard | group-settings | manage-roles | logout
//! /researcher/*  (res.)   dashboard | group-settings | logout
//! /survey/*      (taker)  (index) | simulatedAI | logout
//! anything else           → /login
//! ```
//!
//! Unknown children of an area redirect to that area's landing page once the
//! guard has let the user in.

use portal_core::Role;
use serde::Serialize;

use crate::guard::{self, AccessDecision, LOGIN_PATH};
use crate::session::SessionSnapshot;

/// Role-gated route subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Area {
    Admin,
    Researcher,
    Survey,
}

impl Area {
    #[must_use]
    pub const fn required_role(self) -> Role {
        match self {
            Self::Admin => Role::Admin,
            Self::Researcher => Role::Researcher,
            Self::Survey => Role::SurveyTaker,
        }
    }

    /// Where unknown children of this area land.
    #[must_use]
    pub const fn landing_path(self) -> &'static str {
        match self {
            Self::Admin => guard::ADMIN_HOME,
            Self::Researcher => guard::RESEARCHER_HOME,
            Self::Survey => guard::SURVEY_HOME,
        }
    }

    fn from_segment(segment: &str) -> Option<Self> {
        match segment {
            "admin" => Some(Self::Admin),
            "researcher" => Some(Self::Researcher),
            "survey" => Some(Self::Survey),
            _ => None,
        }
    }
}

/// A renderable view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "page", content = "area", rename_all = "snake_case")]
pub enum Page {
    Login,
    Dashboard(Area),
    GroupSettings(Area),
    ManageRoles,
    SurveyTaking,
    Logout(Area),
}

/// Result of attempting to navigate to a path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "target", rename_all = "snake_case")]
pub enum Navigation {
    /// Session still loading; render a neutral placeholder.
    Pending,
    Render(Page),
    Redirect(String),
}

impl Navigation {
    fn redirect(path: &str) -> Self {
        Self::Redirect(path.to_string())
    }
}

/// Resolve `path` against the route table for the given session state.
///
/// Evaluated from scratch on each call so that a role change between
/// navigations takes effect immediately.
#[must_use]
pub fn navigate(snapshot: &SessionSnapshot, path: &str) -> Navigation {
    if snapshot.is_loading {
        return Navigation::Pending;
    }

    let segments = segments(path);
    let Some((&head, rest)) = segments.split_first() else {
        return Navigation::redirect(LOGIN_PATH);
    };

    if head == "login" && rest.is_empty() {
        return match snapshot.session.role() {
            Some(role) => Navigation::redirect(guard::home_path(role)),
            None => Navigation::Render(Page::Login),
        };
    }

    let Some(area) = Area::from_segment(head) else {
        return Navigation::redirect(LOGIN_PATH);
    };

    match guard::decide(&snapshot.session, Some(&area.required_role())) {
        AccessDecision::RedirectLogin => Navigation::redirect(LOGIN_PATH),
        AccessDecision::RedirectHome(home) => Navigation::redirect(home),
        AccessDecision::Render => child_page(area, rest)
            .map_or_else(|| Navigation::redirect(area.landing_path()), Navigation::Render),
    }
}

fn child_page(area: Area, rest: &[&str]) -> Option<Page> {
    match (area, rest) {
        (Area::Survey, [] | ["simulatedAI"]) => Some(Page::SurveyTaking),
        (Area::Admin | Area::Researcher, ["dashboard"]) => Some(Page::Dashboard(area)),
        (Area::Admin | Area::Researcher, ["group-settings"]) => Some(Page::GroupSettings(area)),
        (Area::Admin, ["manage-roles"]) => Some(Page::ManageRoles),
        (_, ["logout"]) => Some(Page::Logout(area)),
        _ => None,
    }
}

/// Path segments without query, fragment, or empty pieces.
fn segments(path: &str) -> Vec<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    path.split('/').filter(|s| !s.is_empty()).collect()
}
