//! End-to-end survey sessions against a scripted backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use portal_core::{CoreError, FlowStep, Phase, Question, QuestionId, Rating};
use portal_survey::{AnswerSource, SurveyError, SurveySession};
use pretty_assertions::assert_eq;

#[derive(Default)]
struct ScriptedBackend {
    questions: Vec<Question>,
    /// (question, phase) → (delay, answer). Missing entries fail with 500.
    answers: HashMap<(QuestionId, Phase), (Duration, String)>,
    rating_fails: bool,
    ratings: Mutex<Vec<Rating>>,
}

impl ScriptedBackend {
    fn answer(mut self, id: impl Into<QuestionId>, phase: Phase, delay_ms: u64, text: &str) -> Self {
        self.answers.insert(
            (id.into(), phase),
            (Duration::from_millis(delay_ms), text.to_string()),
        );
        self
    }
}

impl AnswerSource for ScriptedBackend {
    async fn fetch_questions(&self) -> Result<Vec<Question>, SurveyError> {
        Ok(self.questions.clone())
    }

    async fn fetch_answer(&self, question_id: &QuestionId, phase: Phase) -> Result<String, SurveyError> {
        let Some((delay, text)) = self.answers.get(&(question_id.clone(), phase)).cloned() else {
            return Err(SurveyError::Api {
                status: 500,
                message: "no script".into(),
            });
        };
        tokio::time::sleep(delay).await;
        Ok(text)
    }

    async fn submit_rating(&self, rating: &Rating) -> Result<String, SurveyError> {
        self.ratings.lock().unwrap().push(rating.clone());
        if self.rating_fails {
            return Err(SurveyError::Api {
                status: 503,
                message: "unavailable".into(),
            });
        }
        Ok("Thanks!".into())
    }
}

fn session(backend: ScriptedBackend) -> (Arc<ScriptedBackend>, SurveySession<ScriptedBackend>) {
    let backend = Arc::new(backend);
    let session = SurveySession::new(Arc::clone(&backend), Duration::from_secs(30));
    (backend, session)
}

#[tokio::test(start_paused = true)]
async fn full_happy_path_ends_logged_out() {
    let (backend, mut session) = session(
        ScriptedBackend {
            questions: vec![Question::new(1, "Q1")],
            ..Default::default()
        }
        .answer(1, Phase::Pre, 10, "thinking...")
        .answer(1, Phase::Final, 2_000, "42"),
    );
    let mut rx = session.subscribe();

    assert_eq!(session.load_questions().await.unwrap(), 1);
    session.accept_consent().unwrap();
    assert_eq!(session.step(), FlowStep::ScenarioIntro);
    session.acknowledge_intro().unwrap();

    session.select_index(0).unwrap();
    assert_eq!(session.step(), FlowStep::AwaitingPre);

    assert_eq!(session.next_outcome().await, Some(true));
    assert_eq!(session.step(), FlowStep::AwaitingFinal);
    assert_eq!(
        session.snapshot().answers.unwrap().pre_answer_message.as_deref(),
        Some("thinking...")
    );

    session.settle().await;
    let snapshot = session.snapshot();
    assert_eq!(snapshot.step, FlowStep::Answered);
    assert_eq!(snapshot.answers.unwrap().final_answer.as_deref(), Some("42"));

    let message = session.submit_rating(5).await.unwrap();
    assert_eq!(message, "Thanks!");
    assert_eq!(session.snapshot().notice.as_deref(), Some("Rating submitted! Thanks!"));
    assert_eq!(
        *backend.ratings.lock().unwrap(),
        vec![Rating::new(QuestionId::Number(1), 5).unwrap()]
    );

    session.finish().unwrap();
    assert_eq!(session.step(), FlowStep::Finishing);
    session.acknowledge_thank_you().unwrap();
    assert_eq!(session.step(), FlowStep::LoggedOut);
    assert_eq!(rx.borrow_and_update().step, FlowStep::LoggedOut);
}

#[tokio::test]
async fn declining_consent_never_shows_the_survey() {
    let (_, mut session) = session(ScriptedBackend::default());
    let mut rx = session.subscribe();
    let mut seen = vec![rx.borrow_and_update().step];

    session.decline_consent().unwrap();
    seen.push(rx.borrow_and_update().step);

    assert_eq!(seen, vec![FlowStep::Consent, FlowStep::LoggedOut]);
    assert!(session.acknowledge_intro().is_err());
}

#[tokio::test(start_paused = true)]
async fn stale_answer_for_previous_question_is_discarded() {
    let (_, mut session) = session(
        ScriptedBackend {
            questions: vec![Question::new("a", "A"), Question::new("b", "B")],
            ..Default::default()
        }
        .answer("a", Phase::Pre, 10, "A pre")
        .answer("a", Phase::Final, 1_000, "A final")
        .answer("b", Phase::Pre, 5_000, "B pre")
        .answer("b", Phase::Final, 6_000, "B final"),
    );
    session.load_questions().await.unwrap();
    session.accept_consent().unwrap();
    session.acknowledge_intro().unwrap();

    session.select_index(0).unwrap();
    assert_eq!(session.next_outcome().await, Some(true));

    // A's final is still outstanding when B is selected.
    session.select_index(1).unwrap();
    assert_eq!(session.next_outcome().await, Some(false));
    let answers = session.snapshot().answers.unwrap();
    assert_eq!(answers.question_id, QuestionId::from("b"));
    assert_eq!(answers.final_answer, None);

    session.settle().await;
    let answers = session.snapshot().answers.unwrap();
    assert_eq!(answers.pre_answer_message.as_deref(), Some("B pre"));
    assert_eq!(answers.final_answer.as_deref(), Some("B final"));
}

#[tokio::test(start_paused = true)]
async fn failed_phase_shows_placeholder_and_flow_continues() {
    let (_, mut session) = session(
        ScriptedBackend {
            questions: vec![Question::new(1, "Q1")],
            ..Default::default()
        }
        .answer(1, Phase::Final, 10, "42"),
    );
    session.load_questions().await.unwrap();
    session.accept_consent().unwrap();
    session.acknowledge_intro().unwrap();
    session.select_index(0).unwrap();
    session.settle().await;

    let answers = session.snapshot().answers.unwrap();
    assert_eq!(
        answers.pre_answer_message.as_deref(),
        Some("Error retrieving pre-answer.")
    );
    assert_eq!(answers.final_answer.as_deref(), Some("42"));
    assert_eq!(session.step(), FlowStep::Answered);
}

#[tokio::test(start_paused = true)]
async fn slow_phase_times_out_to_placeholder() {
    let (_, mut session) = session(
        ScriptedBackend {
            questions: vec![Question::new(1, "Q1")],
            ..Default::default()
        }
        .answer(1, Phase::Pre, 10, "thinking...")
        .answer(1, Phase::Final, 120_000, "too late"),
    );
    session.load_questions().await.unwrap();
    session.accept_consent().unwrap();
    session.acknowledge_intro().unwrap();
    session.select_index(0).unwrap();
    session.settle().await;

    assert_eq!(
        session.snapshot().answers.unwrap().final_answer.as_deref(),
        Some("Error retrieving final answer.")
    );
}

#[tokio::test(start_paused = true)]
async fn rating_before_final_answer_is_rejected() {
    let (backend, mut session) = session(
        ScriptedBackend {
            questions: vec![Question::new(1, "Q1")],
            ..Default::default()
        }
        .answer(1, Phase::Pre, 10, "thinking...")
        .answer(1, Phase::Final, 5_000, "42"),
    );
    session.load_questions().await.unwrap();
    session.accept_consent().unwrap();
    session.acknowledge_intro().unwrap();
    session.select_index(0).unwrap();

    let err = session.submit_rating(4).await.unwrap_err();
    assert!(matches!(err, SurveyError::Flow(CoreError::Validation(_))));
    assert!(backend.ratings.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn rating_submit_failure_sets_notice_only() {
    let (_, mut session) = session(
        ScriptedBackend {
            questions: vec![Question::new(1, "Q1")],
            rating_fails: true,
            ..Default::default()
        }
        .answer(1, Phase::Pre, 10, "thinking...")
        .answer(1, Phase::Final, 20, "42"),
    );
    session.load_questions().await.unwrap();
    session.accept_consent().unwrap();
    session.acknowledge_intro().unwrap();
    session.select_index(0).unwrap();
    session.settle().await;

    assert!(session.submit_rating(3).await.is_err());
    let snapshot = session.snapshot();
    assert_eq!(snapshot.step, FlowStep::Answered);
    assert_eq!(snapshot.notice.as_deref(), Some("Failed to submit rating."));
    // No retry is attempted; the user may submit again.
    assert!(session.submit_rating(3).await.is_err());
}

#[tokio::test]
async fn logout_mid_flow() {
    let (_, mut session) = session(ScriptedBackend::default());
    session.accept_consent().unwrap();
    session.acknowledge_intro().unwrap();
    session.logout().unwrap();
    assert_eq!(session.step(), FlowStep::LoggedOut);
    assert!(session.select_index(0).is_err());
}
