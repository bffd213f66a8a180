use std::future::Future;

use portal_core::{Phase, Question, QuestionId, Rating};

use crate::error::SurveyError;

/// The survey backend as the flow sees it.
///
/// [`SurveyClient`](crate::SurveyClient) is the HTTP implementation.
pub trait AnswerSource: Send + Sync + 'static {
    /// The fixed question list.
    fn fetch_questions(&self) -> impl Future<Output = Result<Vec<Question>, SurveyError>> + Send;

    /// Answer text for one phase of one question. A response without the
    /// phase's field resolves to the empty string.
    fn fetch_answer(
        &self,
        question_id: &QuestionId,
        phase: Phase,
    ) -> impl Future<Output = Result<String, SurveyError>> + Send;

    /// Submit a rating; returns the backend's confirmation message.
    fn submit_rating(&self, rating: &Rating)
    -> impl Future<Output = Result<String, SurveyError>> + Send;
}
