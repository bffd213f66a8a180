//! HTTP client for the survey backend.
//!
//! ```text
//! GET  /fixed-questions                    → [{id, question}]
//! POST /ask  {questionId, phase}           → {preAnswerMessage?} | {finalAnswer?}
//! POST /rate {questionId, rating}          → {message}
//! ```

use std::time::Duration;

use portal_core::{Phase, Question, QuestionId, Rating};
use serde::{Deserialize, Serialize};

use crate::error::SurveyError;
use crate::http::{check_response, parse_json, read_json};
use crate::source::AnswerSource;

#[derive(Serialize)]
struct AskRequest<'a> {
    #[serde(rename = "questionId")]
    question_id: &'a QuestionId,
    phase: &'static str,
}

#[derive(Deserialize)]
struct AskResponse {
    #[serde(rename = "preAnswerMessage", default)]
    pre_answer_message: Option<String>,
    #[serde(rename = "finalAnswer", default)]
    final_answer: Option<String>,
}

#[derive(Serialize)]
struct RateRequest<'a> {
    #[serde(rename = "questionId")]
    question_id: &'a QuestionId,
    rating: u8,
}

#[derive(Deserialize)]
struct RateResponse {
    #[serde(default)]
    message: Option<String>,
}

pub struct SurveyClient {
    http: reqwest::Client,
    base_url: String,
}

impl SurveyClient {
    /// # Errors
    ///
    /// Returns [`SurveyError::Http`] if the underlying `reqwest::Client`
    /// fails to build.
    pub fn new(
        base_url: impl Into<String>,
        user_agent: &str,
        timeout: Duration,
    ) -> Result<Self, SurveyError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self::with_client(http, base_url))
    }

    #[must_use]
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }
}

/// Pull the text for `phase` out of an `/ask` response body.
fn parse_answer(phase: Phase, body: &str) -> Result<String, SurveyError> {
    let resp: AskResponse = parse_json(body)?;
    let text = match phase {
        Phase::Pre => resp.pre_answer_message,
        Phase::Final => resp.final_answer,
    };
    Ok(text.unwrap_or_default())
}

impl AnswerSource for SurveyClient {
    async fn fetch_questions(&self) -> Result<Vec<Question>, SurveyError> {
        let resp = check_response(self.http.get(self.url("fixed-questions")).send().await?).await?;
        let questions: Vec<Question> = read_json(resp).await?;
        tracing::debug!(count = questions.len(), "fetched fixed questions");
        Ok(questions)
    }

    async fn fetch_answer(&self, question_id: &QuestionId, phase: Phase) -> Result<String, SurveyError> {
        let resp = self
            .http
            .post(self.url("ask"))
            .json(&AskRequest {
                question_id,
                phase: phase.as_str(),
            })
            .send()
            .await?;
        let body = check_response(resp).await?.text().await?;
        parse_answer(phase, &body)
    }

    async fn submit_rating(&self, rating: &Rating) -> Result<String, SurveyError> {
        let resp = self
            .http
            .post(self.url("rate"))
            .json(&RateRequest {
                question_id: &rating.question_id,
                rating: rating.stars,
            })
            .send()
            .await?;
        let body: RateResponse = read_json(check_response(resp).await?).await?;
        Ok(body.message.unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Phase::Pre, r#"{"preAnswerMessage": "thinking..."}"#, "thinking...")]
    #[case(Phase::Final, r#"{"finalAnswer": "42"}"#, "42")]
    #[case(Phase::Pre, r#"{"finalAnswer": "42"}"#, "")]
    #[case(Phase::Final, r#"{"finalAnswer": null}"#, "")]
    #[case(Phase::Final, "{}", "")]
    fn answer_field_per_phase(#[case] phase: Phase, #[case] body: &str, #[case] expected: &str) {
        assert_eq!(parse_answer(phase, body).unwrap(), expected);
    }

    #[test]
    fn answer_body_must_be_json() {
        let err = parse_answer(Phase::Pre, "<html>").unwrap_err();
        assert!(matches!(err, SurveyError::Parse(_)));
    }

    #[test]
    fn ask_request_echoes_id_shape() {
        let numeric = QuestionId::Number(1);
        let body = serde_json::to_value(AskRequest {
            question_id: &numeric,
            phase: Phase::Final.as_str(),
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"questionId": 1, "phase": "final"}));

        let text = QuestionId::from("q-7");
        let body = serde_json::to_value(RateRequest {
            question_id: &text,
            rating: 5,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"questionId": "q-7", "rating": 5}));
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = SurveyClient::with_client(reqwest::Client::new(), "https://api.example.org/");
        assert_eq!(client.url("ask"), "https://api.example.org/ask");
    }
}
