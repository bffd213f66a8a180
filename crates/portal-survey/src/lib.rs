//! # portal-survey
//!
//! The survey-taking side of the portal:
//! - [`SurveyClient`]: HTTP client for the questions/answers/ratings backend
//! - [`AnswerPipeline`]: per-selection pre/final retrieval with timeouts
//! - [`SurveyFlow`]: the consent → questions → rating → finish state machine
//! - [`SurveySession`]: async driver wiring the pipeline into the flow

pub mod client;
pub mod flow;
pub mod pipeline;
pub mod session;
pub mod source;

mod error;
mod http;

pub use client::SurveyClient;
pub use error::SurveyError;
pub use flow::{FlowSnapshot, PhaseOutcome, SelectionTicket, SurveyFlow};
pub use pipeline::{AnswerPipeline, DEFAULT_PHASE_TIMEOUT};
pub use session::SurveySession;
pub use source::AnswerSource;
