//! Entity structs for the survey-taking flow.

mod answer;
mod question;
mod rating;

pub use answer::AnswerPair;
pub use question::{Question, QuestionId};
pub use rating::Rating;
