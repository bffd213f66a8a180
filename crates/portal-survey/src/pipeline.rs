use std::sync::Arc;
use std::time::Duration;

use portal_core::{Phase, QuestionId};
use tokio::sync::mpsc;

use crate::error::SurveyError;
use crate::flow::{PhaseOutcome, SelectionTicket};
use crate::source::AnswerSource;

/// Default bound on one network phase.
pub const DEFAULT_PHASE_TIMEOUT: Duration = Duration::from_secs(30);

/// Runs the two network phases of every selection.
///
/// Each selection gets one task that starts the pre request, then the final
/// request, and drives both concurrently. Results come back over the channel
/// in whatever order they finish, tagged with the selection's ticket. Earlier
/// selections are not cancelled; their late results are discarded by the
/// flow.
pub struct AnswerPipeline<S> {
    source: Arc<S>,
    phase_timeout: Duration,
    tx: mpsc::UnboundedSender<PhaseOutcome>,
}

impl<S: AnswerSource> AnswerPipeline<S> {
    /// Create a pipeline and the receiver its results arrive on.
    #[must_use]
    pub fn new(
        source: Arc<S>,
        phase_timeout: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<PhaseOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                source,
                phase_timeout,
                tx,
            },
            rx,
        )
    }

    #[must_use]
    pub const fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Issue both phases for `ticket`, pre first.
    pub fn dispatch(&self, ticket: &SelectionTicket) {
        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        let ticket = ticket.clone();
        let phase_timeout = self.phase_timeout;
        tokio::spawn(async move {
            // join! polls in argument order, so pre is issued before final.
            tokio::join!(
                report_phase(source.as_ref(), &tx, &ticket, Phase::Pre, phase_timeout),
                report_phase(source.as_ref(), &tx, &ticket, Phase::Final, phase_timeout),
            );
        });
    }
}

async fn report_phase<S: AnswerSource>(
    source: &S,
    tx: &mpsc::UnboundedSender<PhaseOutcome>,
    ticket: &SelectionTicket,
    phase: Phase,
    phase_timeout: Duration,
) {
    let text = resolve_phase(source, &ticket.question_id, phase, phase_timeout).await;
    // The receiver is gone once the session ends.
    let _ = tx.send(PhaseOutcome {
        ticket: ticket.clone(),
        phase,
        text,
    });
}

/// Fetch one phase, turning failure or timeout into the phase placeholder.
pub async fn resolve_phase<S: AnswerSource>(
    source: &S,
    question_id: &QuestionId,
    phase: Phase,
    phase_timeout: Duration,
) -> String {
    let result = match tokio::time::timeout(phase_timeout, source.fetch_answer(question_id, phase))
        .await
    {
        Ok(result) => result,
        Err(_) => Err(SurveyError::Timeout {
            phase,
            secs: phase_timeout.as_secs(),
        }),
    };

    match result {
        Ok(text) => {
            tracing::debug!(%question_id, %phase, "phase resolved");
            text
        }
        Err(error) => {
            tracing::warn!(%question_id, %phase, %error, "phase failed");
            phase.failure_placeholder().to_string()
        }
    }
}
