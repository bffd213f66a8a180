//! # portal-core
//!
//! Core domain types shared across the survey portal crates.
//!
//! - Role and phase enums, plus the survey flow step machine
//! - Entity structs for questions, answer pairs and ratings
//! - The provider-neutral identity record
//! - Cross-cutting error types

pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;

pub use entities::{AnswerPair, Question, QuestionId, Rating};
pub use enums::{FlowStep, Phase, Role};
pub use errors::CoreError;
pub use identity::Identity;
