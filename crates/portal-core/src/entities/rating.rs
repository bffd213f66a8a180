use serde::{Deserialize, Serialize};

use crate::entities::QuestionId;
use crate::errors::CoreError;

/// A star rating for one question's final answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub question_id: QuestionId,
    pub stars: u8,
}

impl Rating {
    pub const MIN_STARS: u8 = 1;
    pub const MAX_STARS: u8 = 5;

    /// Build a rating, rejecting star counts outside `1..=5`.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` when `stars` is out of range.
    pub fn new(question_id: QuestionId, stars: u8) -> Result<Self, CoreError> {
        if !(Self::MIN_STARS..=Self::MAX_STARS).contains(&stars) {
            return Err(CoreError::Validation(format!(
                "rating must be between {} and {} stars, got {stars}",
                Self::MIN_STARS,
                Self::MAX_STARS
            )));
        }
        Ok(Self { question_id, stars })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(3)]
    #[case(5)]
    fn accepts_one_to_five(#[case] stars: u8) {
        let rating = Rating::new(QuestionId::Number(1), stars).unwrap();
        assert_eq!(rating.stars, stars);
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    #[case(255)]
    fn rejects_out_of_range(#[case] stars: u8) {
        let err = Rating::new(QuestionId::Number(1), stars).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(err.to_string().contains("between 1 and 5"));
    }
}
