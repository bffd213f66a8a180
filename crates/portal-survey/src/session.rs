use std::sync::Arc;
use std::time::Duration;

use portal_core::{CoreError, FlowStep, Question};
use tokio::sync::{mpsc, watch};

use crate::error::SurveyError;
use crate::flow::{FlowSnapshot, PhaseOutcome, SurveyFlow};
use crate::pipeline::AnswerPipeline;
use crate::source::AnswerSource;

pub const RATING_FAILED_NOTICE: &str = "Failed to submit rating.";

/// One survey-taking session: a [`SurveyFlow`] plus the pipeline feeding it.
///
/// Every state change is published as a [`FlowSnapshot`]; views subscribe
/// with [`SurveySession::subscribe`].
pub struct SurveySession<S> {
    flow: SurveyFlow,
    pipeline: AnswerPipeline<S>,
    outcomes: mpsc::UnboundedReceiver<PhaseOutcome>,
    state: watch::Sender<FlowSnapshot>,
}

impl<S: AnswerSource> SurveySession<S> {
    #[must_use]
    pub fn new(source: Arc<S>, phase_timeout: Duration) -> Self {
        let flow = SurveyFlow::new();
        let (state, _) = watch::channel(flow.snapshot());
        let (pipeline, outcomes) = AnswerPipeline::new(source, phase_timeout);
        Self {
            flow,
            pipeline,
            outcomes,
            state,
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<FlowSnapshot> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> FlowSnapshot {
        self.flow.snapshot()
    }

    #[must_use]
    pub const fn step(&self) -> FlowStep {
        self.flow.step()
    }

    /// Fetch the fixed questions. On failure the list stays empty and the
    /// error is returned for display; the flow itself carries on.
    ///
    /// # Errors
    ///
    /// Returns the source's error.
    pub async fn load_questions(&mut self) -> Result<usize, SurveyError> {
        match self.pipeline.source().fetch_questions().await {
            Ok(questions) => {
                let count = questions.len();
                self.flow.set_questions(questions);
                self.publish();
                Ok(count)
            }
            Err(error) => {
                tracing::error!(%error, "failed to fetch questions");
                Err(error)
            }
        }
    }

    /// # Errors
    ///
    /// See [`SurveyFlow::accept_consent`].
    pub fn accept_consent(&mut self) -> Result<(), CoreError> {
        self.apply_event(SurveyFlow::accept_consent)
    }

    /// # Errors
    ///
    /// See [`SurveyFlow::decline_consent`].
    pub fn decline_consent(&mut self) -> Result<(), CoreError> {
        self.apply_event(SurveyFlow::decline_consent)
    }

    /// # Errors
    ///
    /// See [`SurveyFlow::acknowledge_intro`].
    pub fn acknowledge_intro(&mut self) -> Result<(), CoreError> {
        self.apply_event(SurveyFlow::acknowledge_intro)
    }

    /// Select a question and start both phase requests.
    ///
    /// # Errors
    ///
    /// See [`SurveyFlow::select`].
    pub fn select(&mut self, question: Question) -> Result<(), CoreError> {
        let ticket = self.flow.select(question)?;
        tracing::debug!(question_id = %ticket.question_id, serial = ticket.serial, "question selected");
        self.pipeline.dispatch(&ticket);
        self.publish();
        Ok(())
    }

    /// Select by position in the loaded question list.
    ///
    /// # Errors
    ///
    /// `Validation` for an index outside the list, else see [`SurveyFlow::select`].
    pub fn select_index(&mut self, index: usize) -> Result<(), CoreError> {
        let question = self
            .flow
            .questions()
            .get(index)
            .cloned()
            .ok_or_else(|| CoreError::Validation(format!("no question at position {}", index + 1)))?;
        self.select(question)
    }

    /// Wait for the next phase result and apply it. Returns whether it was
    /// applied (`false` for stale results), or `None` if the pipeline is gone.
    pub async fn next_outcome(&mut self) -> Option<bool> {
        let outcome = self.outcomes.recv().await?;
        let applied = self.flow.apply(outcome);
        if applied {
            self.publish();
        }
        Some(applied)
    }

    /// Apply results until the current selection has both phases.
    pub async fn settle(&mut self) {
        while self.flow.step().is_fetching() {
            if self.next_outcome().await.is_none() {
                break;
            }
        }
    }

    /// Rate the current final answer and submit it.
    ///
    /// Submission failures set a notice and leave the flow unchanged; the
    /// rating may simply be submitted again.
    ///
    /// # Errors
    ///
    /// `Flow` when the controller rejects the rating, else the source's
    /// submission error.
    pub async fn submit_rating(&mut self, stars: u8) -> Result<String, SurveyError> {
        let rating = self.flow.rate(stars)?;
        let result = self.pipeline.source().submit_rating(&rating).await;
        match &result {
            Ok(message) => {
                tracing::info!(question_id = %rating.question_id, stars, "rating submitted");
                self.flow.set_notice(format!("Rating submitted! {message}"));
            }
            Err(error) => {
                tracing::warn!(question_id = %rating.question_id, %error, "rating submission failed");
                self.flow.set_notice(RATING_FAILED_NOTICE);
            }
        }
        self.publish();
        result
    }

    /// # Errors
    ///
    /// See [`SurveyFlow::finish`].
    pub fn finish(&mut self) -> Result<(), CoreError> {
        self.apply_event(SurveyFlow::finish)
    }

    /// # Errors
    ///
    /// See [`SurveyFlow::acknowledge_thank_you`].
    pub fn acknowledge_thank_you(&mut self) -> Result<(), CoreError> {
        self.apply_event(SurveyFlow::acknowledge_thank_you)
    }

    /// # Errors
    ///
    /// See [`SurveyFlow::logout`].
    pub fn logout(&mut self) -> Result<(), CoreError> {
        self.apply_event(SurveyFlow::logout)
    }

    fn apply_event(
        &mut self,
        event: impl FnOnce(&mut SurveyFlow) -> Result<(), CoreError>,
    ) -> Result<(), CoreError> {
        event(&mut self.flow)?;
        self.publish();
        Ok(())
    }

    fn publish(&self) {
        self.state.send_replace(self.flow.snapshot());
    }
}
