//! Role, answer phase, and survey flow step enums.
//!
//! `FlowStep` provides `allowed_next_states()` so the flow controller can
//! enforce its transition table at the application layer.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Authorization tier controlling which route subtree a session may render.
///
/// Claim values are never validated against the known tiers: anything that is
/// not `admin`, `researcher` or `survey-taker` is carried verbatim as
/// [`Role::Other`] and fails closed wherever a specific role is required.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    Admin,
    Researcher,
    SurveyTaker,
    Other(String),
}

impl Role {
    /// The role every authenticated user gets when no claim says otherwise.
    pub const DEFAULT: Self = Self::SurveyTaker;

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Admin => "admin",
            Self::Researcher => "researcher",
            Self::SurveyTaker => "survey-taker",
            Self::Other(raw) => raw,
        }
    }

    /// Whether the value is one of the three known tiers.
    #[must_use]
    pub const fn is_recognized(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<&str> for Role {
    fn from(value: &str) -> Self {
        match value {
            "admin" => Self::Admin,
            "researcher" => Self::Researcher,
            "survey-taker" => Self::SurveyTaker,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match Self::from(value.as_str()) {
            Self::Other(_) => Self::Other(value),
            known => known,
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Phase
// ---------------------------------------------------------------------------

/// One of the two answer-retrieval steps issued per selected question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Pre,
    Final,
}

impl Phase {
    /// Both phases, in issue order.
    pub const ALL: [Self; 2] = [Self::Pre, Self::Final];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pre => "pre",
            Self::Final => "final",
        }
    }

    /// Text shown in place of the answer when this phase fails or times out.
    #[must_use]
    pub const fn failure_placeholder(self) -> &'static str {
        match self {
            Self::Pre => "Error retrieving pre-answer.",
            Self::Final => "Error retrieving final answer.",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// FlowStep
// ---------------------------------------------------------------------------

/// Step of one survey-taking flow instance.
///
/// ```text
/// consent → scenario_intro → browsing → awaiting_pre → awaiting_final → answered
///         ↘ logged_out                ↘ finishing → logged_out
///
/// awaiting_pre | awaiting_final | answered → awaiting_pre   (re-selection)
/// any non-terminal step                    → logged_out     (logout)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowStep {
    Consent,
    ScenarioIntro,
    Browsing,
    AwaitingPre,
    AwaitingFinal,
    Answered,
    Finishing,
    LoggedOut,
}

impl FlowStep {
    /// Valid next steps from the current step.
    ///
    /// `awaiting_pre → answered` covers a final answer that landed before the
    /// pre answer. `answered → answered` is a rating submission.
    #[must_use]
    #[allow(clippy::match_same_arms)]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::Consent => &[Self::ScenarioIntro, Self::LoggedOut],
            Self::ScenarioIntro => &[Self::Browsing, Self::LoggedOut],
            Self::Browsing => &[Self::AwaitingPre, Self::Finishing, Self::LoggedOut],
            Self::AwaitingPre => &[
                Self::AwaitingPre,
                Self::AwaitingFinal,
                Self::Answered,
                Self::LoggedOut,
            ],
            Self::AwaitingFinal => &[Self::AwaitingPre, Self::Answered, Self::LoggedOut],
            Self::Answered => &[
                Self::AwaitingPre,
                Self::Answered,
                Self::Finishing,
                Self::LoggedOut,
            ],
            Self::Finishing => &[Self::LoggedOut],
            Self::LoggedOut => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::LoggedOut)
    }

    /// Whether a question is selected and at least one phase is outstanding.
    #[must_use]
    pub const fn is_fetching(self) -> bool {
        matches!(self, Self::AwaitingPre | Self::AwaitingFinal)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Consent => "consent",
            Self::ScenarioIntro => "scenario_intro",
            Self::Browsing => "browsing",
            Self::AwaitingPre => "awaiting_pre",
            Self::AwaitingFinal => "awaiting_final",
            Self::Answered => "answered",
            Self::Finishing => "finishing",
            Self::LoggedOut => "logged_out",
        }
    }
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
