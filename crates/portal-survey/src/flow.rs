//! Survey-taking state machine.
//!
//! ```text
//! Consent ──accept──▶ ScenarioIntro ──acknowledge──▶ Browsing
//!    │                                                 │ select(q)
//!    └─decline─▶ LoggedOut                             ▼
//!                                     AwaitingPre ◀── select(q') ──┐
//!                                          │ pre resolved          │
//!                                          ▼                       │
//!                                     AwaitingFinal                │
//!                                          │ final resolved        │
//!                                          ▼                       │
//!                                      Answered ──── rate ─────────┤
//!                                          │ finish                │
//!                                          ▼                       │
//!                  LoggedOut ◀─ack─ Finishing ◀── finish (Browsing)┘
//! ```
//!
//! Any non-terminal step may log out. The controller is a plain value: it
//! performs no I/O and is driven by [`SurveySession`](crate::SurveySession).

use portal_core::{AnswerPair, CoreError, FlowStep, Phase, Question, QuestionId, Rating};
use serde::Serialize;

/// Identifies one selection. Outcomes carrying an older ticket are stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionTicket {
    pub serial: u64,
    pub question_id: QuestionId,
}

/// A resolved network phase, as reported by the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseOutcome {
    pub ticket: SelectionTicket,
    pub phase: Phase,
    /// Server text, the empty string, or the phase's failure placeholder.
    pub text: String,
}

/// Everything a view needs to render the flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FlowSnapshot {
    pub step: FlowStep,
    pub questions: Vec<Question>,
    pub selected: Option<Question>,
    pub answers: Option<AnswerPair>,
    pub rating: Option<Rating>,
    /// Last user-facing notice (rating confirmation or failure).
    pub notice: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SurveyFlow {
    step: FlowStep,
    questions: Vec<Question>,
    selected: Option<Question>,
    answers: Option<AnswerPair>,
    rating: Option<Rating>,
    notice: Option<String>,
    serial: u64,
}

impl Default for SurveyFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl SurveyFlow {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            step: FlowStep::Consent,
            questions: Vec::new(),
            selected: None,
            answers: None,
            rating: None,
            notice: None,
            serial: 0,
        }
    }

    #[must_use]
    pub const fn step(&self) -> FlowStep {
        self.step
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub const fn selected(&self) -> Option<&Question> {
        self.selected.as_ref()
    }

    #[must_use]
    pub const fn answers(&self) -> Option<&AnswerPair> {
        self.answers.as_ref()
    }

    #[must_use]
    pub fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot {
            step: self.step,
            questions: self.questions.clone(),
            selected: self.selected.clone(),
            answers: self.answers.clone(),
            rating: self.rating.clone(),
            notice: self.notice.clone(),
        }
    }

    /// Replace the question list. Allowed in any step; the list is content,
    /// not flow state.
    pub fn set_questions(&mut self, questions: Vec<Question>) {
        self.questions = questions;
    }

    pub fn set_notice(&mut self, notice: impl Into<String>) {
        self.notice = Some(notice.into());
    }

    /// # Errors
    ///
    /// `InvalidTransition` unless the flow is at `Consent`.
    pub fn accept_consent(&mut self) -> Result<(), CoreError> {
        self.expect_step(FlowStep::Consent, "accept_consent")?;
        self.transition("accept_consent", FlowStep::ScenarioIntro)
    }

    /// Declining consent logs the user out without showing the survey.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` unless the flow is at `Consent`.
    pub fn decline_consent(&mut self) -> Result<(), CoreError> {
        self.expect_step(FlowStep::Consent, "decline_consent")?;
        self.transition("decline_consent", FlowStep::LoggedOut)
    }

    /// # Errors
    ///
    /// `InvalidTransition` unless the flow is at `ScenarioIntro`.
    pub fn acknowledge_intro(&mut self) -> Result<(), CoreError> {
        self.expect_step(FlowStep::ScenarioIntro, "acknowledge_intro")?;
        self.transition("acknowledge_intro", FlowStep::Browsing)
    }

    /// Select a question, dropping any previous answers and rating.
    ///
    /// Returns the ticket the pipeline must tag both phase results with.
    ///
    /// # Errors
    ///
    /// `InvalidTransition` outside `Browsing`, `AwaitingPre`, `AwaitingFinal`
    /// and `Answered`.
    pub fn select(&mut self, question: Question) -> Result<SelectionTicket, CoreError> {
        self.transition("select", FlowStep::AwaitingPre)?;
        self.serial += 1;
        let ticket = SelectionTicket {
            serial: self.serial,
            question_id: question.id.clone(),
        };
        self.answers = Some(AnswerPair::new(question.id.clone()));
        self.selected = Some(question);
        self.rating = None;
        self.notice = None;
        Ok(ticket)
    }

    /// Apply a phase result. Returns `false` when the result is stale (its
    /// selection has been superseded) or nothing is awaiting it.
    pub fn apply(&mut self, outcome: PhaseOutcome) -> bool {
        if !self.step.is_fetching() || outcome.ticket.serial != self.serial {
            tracing::debug!(
                question_id = %outcome.ticket.question_id,
                phase = %outcome.phase,
                "discarding stale phase result"
            );
            return false;
        }
        let Some(answers) = self.answers.as_mut() else {
            return false;
        };
        if answers.question_id != outcome.ticket.question_id {
            return false;
        }

        answers.resolve(outcome.phase, outcome.text);
        self.step = match (
            answers.is_resolved(Phase::Pre),
            answers.is_resolved(Phase::Final),
        ) {
            (true, true) => FlowStep::Answered,
            (true, false) => FlowStep::AwaitingFinal,
            _ => FlowStep::AwaitingPre,
        };
        true
    }

    /// Record a star rating for the selected question's final answer.
    ///
    /// # Errors
    ///
    /// `Validation` when there is no non-empty final answer or `stars` is
    /// outside 1..=5; `InvalidTransition` outside `Answered`.
    pub fn rate(&mut self, stars: u8) -> Result<Rating, CoreError> {
        let answers = self
            .answers
            .as_ref()
            .filter(|answers| answers.has_final_answer())
            .ok_or_else(|| CoreError::Validation("no final answer to rate yet".into()))?;
        let rating = Rating::new(answers.question_id.clone(), stars)?;
        self.expect_step(FlowStep::Answered, "rate")?;
        self.transition("rate", FlowStep::Answered)?;
        self.rating = Some(rating.clone());
        Ok(rating)
    }

    /// # Errors
    ///
    /// `InvalidTransition` outside `Browsing` and `Answered`.
    pub fn finish(&mut self) -> Result<(), CoreError> {
        self.transition("finish", FlowStep::Finishing)
    }

    /// # Errors
    ///
    /// `InvalidTransition` unless the flow is at `Finishing`.
    pub fn acknowledge_thank_you(&mut self) -> Result<(), CoreError> {
        self.expect_step(FlowStep::Finishing, "acknowledge_thank_you")?;
        self.transition("acknowledge_thank_you", FlowStep::LoggedOut)
    }

    /// # Errors
    ///
    /// `InvalidTransition` once already logged out.
    pub fn logout(&mut self) -> Result<(), CoreError> {
        self.transition("logout", FlowStep::LoggedOut)
    }

    fn expect_step(&self, expected: FlowStep, event: &str) -> Result<(), CoreError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(self.invalid(event))
        }
    }

    fn transition(&mut self, event: &str, next: FlowStep) -> Result<(), CoreError> {
        if !self.step.can_transition_to(next) {
            return Err(self.invalid(event));
        }
        tracing::debug!(from = %self.step, to = %next, event, "survey flow transition");
        self.step = next;
        if next.is_terminal() {
            self.selected = None;
            self.answers = None;
            self.rating = None;
        }
        Ok(())
    }

    fn invalid(&self, event: &str) -> CoreError {
        CoreError::InvalidTransition {
            from: self.step.to_string(),
            event: event.to_string(),
        }
    }
}
