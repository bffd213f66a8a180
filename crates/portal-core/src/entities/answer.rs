use serde::{Deserialize, Serialize};

use crate::entities::QuestionId;
use crate::enums::Phase;

/// The two answer texts retrieved for one selected question.
///
/// `None` means the phase has not resolved yet. A resolved phase always holds
/// text: the server's message, the empty string when the server omitted it,
/// or the phase's failure placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerPair {
    pub question_id: QuestionId,
    pub pre_answer_message: Option<String>,
    pub final_answer: Option<String>,
}

impl AnswerPair {
    #[must_use]
    pub const fn new(question_id: QuestionId) -> Self {
        Self {
            question_id,
            pre_answer_message: None,
            final_answer: None,
        }
    }

    /// Store the resolved text for `phase`, replacing any earlier value.
    pub fn resolve(&mut self, phase: Phase, text: String) {
        match phase {
            Phase::Pre => self.pre_answer_message = Some(text),
            Phase::Final => self.final_answer = Some(text),
        }
    }

    #[must_use]
    pub fn get(&self, phase: Phase) -> Option<&str> {
        match phase {
            Phase::Pre => self.pre_answer_message.as_deref(),
            Phase::Final => self.final_answer.as_deref(),
        }
    }

    #[must_use]
    pub fn is_resolved(&self, phase: Phase) -> bool {
        self.get(phase).is_some()
    }

    /// A final answer that can be rated: resolved and non-empty.
    #[must_use]
    pub fn has_final_answer(&self) -> bool {
        self.final_answer.as_deref().is_some_and(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_resolve_independently() {
        let mut pair = AnswerPair::new(QuestionId::Number(1));
        pair.resolve(Phase::Final, "42".into());
        assert!(!pair.is_resolved(Phase::Pre));
        assert_eq!(pair.get(Phase::Final), Some("42"));

        pair.resolve(Phase::Pre, "thinking...".into());
        assert_eq!(pair.get(Phase::Pre), Some("thinking..."));
        assert_eq!(pair.get(Phase::Final), Some("42"));
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let mut pair = AnswerPair::new(QuestionId::Number(1));
        pair.resolve(Phase::Pre, "thinking...".into());
        assert_eq!(
            serde_json::to_value(&pair).unwrap(),
            serde_json::json!({
                "questionId": 1,
                "preAnswerMessage": "thinking...",
                "finalAnswer": null,
            })
        );
    }

    #[test]
    fn empty_final_answer_is_not_rateable() {
        let mut pair = AnswerPair::new(QuestionId::Number(1));
        assert!(!pair.has_final_answer());
        pair.resolve(Phase::Final, String::new());
        assert!(pair.is_resolved(Phase::Final));
        assert!(!pair.has_final_answer());
        pair.resolve(Phase::Final, Phase::Final.failure_placeholder().into());
        assert!(pair.has_final_answer());
    }
}
