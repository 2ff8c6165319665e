use interview_core::model::{Category, Difficulty, Question, QuestionError, QuestionId};
use serde::{Deserialize, Serialize};

/// Serialized shape of a question in a catalog file.
///
/// Mirrors the domain `Question` so catalog files can be parsed without the
/// domain type knowing about serde layout. Validation happens in
/// [`QuestionRecord::into_question`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuestionRecord {
    pub id: String,
    pub category: Category,
    pub difficulty: Difficulty,
    pub prompt: String,
    pub expected_topics: Vec<String>,
    pub time_limit_secs: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub follow_ups: Vec<String>,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            id: question.id().to_string(),
            category: question.category(),
            difficulty: question.difficulty(),
            prompt: question.prompt().to_owned(),
            expected_topics: question.expected_topics().to_vec(),
            time_limit_secs: question.time_limit_secs(),
            follow_ups: question.follow_ups().to_vec(),
        }
    }

    /// Convert the record into a validated domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the record breaks an authoring rule.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        Question::new(
            QuestionId::new(self.id),
            self.category,
            self.difficulty,
            self.prompt,
            self.expected_topics,
            self.time_limit_secs,
            self.follow_ups,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_parses_kebab_case_enums() {
        let json = r#"{
            "id": "prob-9",
            "category": "problem-solving",
            "difficulty": "advanced",
            "prompt": "Debug a memory leak.",
            "expected_topics": ["Heap snapshots"],
            "time_limit_secs": 90
        }"#;
        let record: QuestionRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.category, Category::ProblemSolving);
        assert!(record.follow_ups.is_empty());

        let question = record.clone().into_question().unwrap();
        assert_eq!(QuestionRecord::from_question(&question), record);
    }

    #[test]
    fn record_rejects_unknown_fields() {
        let json = r#"{
            "id": "x", "category": "css", "difficulty": "beginner",
            "prompt": "p", "expected_topics": ["t"], "time_limit_secs": 1,
            "timeLimit": 5
        }"#;
        assert!(serde_json::from_str::<QuestionRecord>(json).is_err());
    }
}
