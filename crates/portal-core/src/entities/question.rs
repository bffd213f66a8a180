use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque question identifier.
///
/// The questions store may hand out numeric or string IDs; the value is kept
/// in the shape it arrived in and echoed back unchanged in `/ask` and `/rate`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuestionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for QuestionId {
    fn from(value: i64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for QuestionId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// A fixed survey question. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    /// Question text. The store names this field `question`.
    #[serde(rename = "question")]
    pub text: String,
}

impl Question {
    #[must_use]
    pub fn new(id: impl Into<QuestionId>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_store_listing_with_mixed_ids() {
        let json = r#"[{"id": 1, "question": "Q1"}, {"id": "q-2", "question": "Q2"}]"#;
        let questions: Vec<Question> = serde_json::from_str(json).unwrap();
        assert_eq!(
            questions,
            vec![Question::new(1, "Q1"), Question::new("q-2", "Q2")]
        );
    }

    #[test]
    fn numeric_id_is_echoed_as_number() {
        let value = serde_json::to_value(QuestionId::Number(7)).unwrap();
        assert_eq!(value, serde_json::json!(7));
        assert_eq!(QuestionId::from("abc").to_string(), "abc");
    }
}
