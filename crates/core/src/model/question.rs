use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question id cannot be empty")]
    EmptyId,

    #[error("question {id}: prompt cannot be empty")]
    EmptyPrompt { id: QuestionId },

    #[error("question {id}: expected topics cannot be empty")]
    NoExpectedTopics { id: QuestionId },

    #[error("question {id}: expected topic #{index} is blank")]
    BlankTopic { id: QuestionId, index: usize },

    #[error("question {id}: time limit must be > 0 seconds")]
    InvalidTimeLimit { id: QuestionId },

    #[error("unknown category: {0}")]
    UnknownCategory(String),

    #[error("unknown difficulty: {0}")]
    UnknownDifficulty(String),
}

//
// ─── CATEGORY ──────────────────────────────────────────────────────────────────
//

/// Topic area a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Technical,
    Behavioral,
    ProjectExperience,
    ProblemSolving,
    FrontendSpecific,
    Javascript,
    React,
    Css,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Technical,
        Category::Behavioral,
        Category::ProjectExperience,
        Category::ProblemSolving,
        Category::FrontendSpecific,
        Category::Javascript,
        Category::React,
        Category::Css,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Technical => "technical",
            Category::Behavioral => "behavioral",
            Category::ProjectExperience => "project-experience",
            Category::ProblemSolving => "problem-solving",
            Category::FrontendSpecific => "frontend-specific",
            Category::Javascript => "javascript",
            Category::React => "react",
            Category::Css => "css",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == needle)
            .ok_or_else(|| QuestionError::UnknownCategory(s.trim().to_owned()))
    }
}

//
// ─── DIFFICULTY ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Difficulty {
    type Err = QuestionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            _ => Err(QuestionError::UnknownDifficulty(s.trim().to_owned())),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// An authored interview question.
///
/// Immutable once built. `Question::new` enforces the authoring rules, so any
/// `Question` value has a non-empty prompt, at least one non-blank expected
/// topic and a positive time limit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    category: Category,
    difficulty: Difficulty,
    prompt: String,
    expected_topics: Vec<String>,
    time_limit_secs: u32,
    follow_ups: Vec<String>,
}

impl Question {
    /// Builds a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the id or prompt is blank, the topic list is
    /// empty or holds a blank entry, or the time limit is zero.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: QuestionId,
        category: Category,
        difficulty: Difficulty,
        prompt: impl Into<String>,
        expected_topics: Vec<String>,
        time_limit_secs: u32,
        follow_ups: Vec<String>,
    ) -> Result<Self, QuestionError> {
        if id.is_empty() {
            return Err(QuestionError::EmptyId);
        }
        let prompt = prompt.into().trim().to_owned();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt { id });
        }
        if expected_topics.is_empty() {
            return Err(QuestionError::NoExpectedTopics { id });
        }
        if let Some(index) = expected_topics.iter().position(|t| t.trim().is_empty()) {
            return Err(QuestionError::BlankTopic { id, index });
        }
        if time_limit_secs == 0 {
            return Err(QuestionError::InvalidTimeLimit { id });
        }

        Ok(Self {
            id,
            category,
            difficulty,
            prompt,
            expected_topics: expected_topics
                .into_iter()
                .map(|t| t.trim().to_owned())
                .collect(),
            time_limit_secs,
            follow_ups: follow_ups
                .into_iter()
                .map(|f| f.trim().to_owned())
                .filter(|f| !f.is_empty())
                .collect(),
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn category(&self) -> Category {
        self.category
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Topics an ideal answer mentions, in authoring order. Never empty.
    #[must_use]
    pub fn expected_topics(&self) -> &[String] {
        &self.expected_topics
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    #[must_use]
    pub fn follow_ups(&self) -> &[String] {
        &self.follow_ups
    }
}
