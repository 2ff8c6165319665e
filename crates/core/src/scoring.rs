//! Keyword-based scoring of free-text answers.
//!
//! A score is the sum of three capped components:
//!
//! | component  | max | rule                                                        |
//! |------------|-----|-------------------------------------------------------------|
//! | topics     | 60  | covered topics / expected topics × 60                       |
//! | length     | 20  | characters / 200 × 20, saturating at 200 characters         |
//! | time bonus | 20  | full when answered under the limit, then −1 per 10s overtime |
//!
//! The total is rounded and capped at 100. The same matching rule
//! ([`topic_is_covered`]) decides both the topic score and the
//! covered/missing partition, so a topic that earned points is never
//! reported as missing.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::model::Question;

pub const TOPIC_WEIGHT: f64 = 60.0;
pub const LENGTH_WEIGHT: f64 = 20.0;
pub const LENGTH_SATURATION_CHARS: f64 = 200.0;
pub const TIME_BONUS_MAX: f64 = 20.0;
/// Overtime seconds that cost one bonus point.
pub const OVERTIME_SECS_PER_POINT: f64 = 10.0;

//
// ─── FEEDBACK ──────────────────────────────────────────────────────────────────
//

/// Score band used to pick the feedback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FeedbackBand {
    /// 80 and above.
    Excellent,
    /// 60–79.
    Good,
    /// 40–59.
    Decent,
    /// Below 40.
    NeedsMoreDepth,
}

impl FeedbackBand {
    #[must_use]
    pub fn for_score(score: u8) -> Self {
        match score {
            80.. => FeedbackBand::Excellent,
            60..=79 => FeedbackBand::Good,
            40..=59 => FeedbackBand::Decent,
            _ => FeedbackBand::NeedsMoreDepth,
        }
    }

    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            FeedbackBand::Excellent => {
                "Excellent answer! You covered the key topics well and demonstrated good understanding."
            }
            FeedbackBand::Good => {
                "Good answer! You covered some important points. Consider elaborating on technical details."
            }
            FeedbackBand::Decent => {
                "Decent attempt! Try to include more specific technical concepts and examples."
            }
            FeedbackBand::NeedsMoreDepth => {
                "Your answer needs more depth. Focus on the key technical concepts and provide concrete examples."
            }
        }
    }
}

//
// ─── EVALUATION ────────────────────────────────────────────────────────────────
//

/// Unrounded score components, each already clamped to its maximum.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub topic: f64,
    pub length: f64,
    pub time_bonus: f64,
}

impl ScoreBreakdown {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.topic + self.length + self.time_bonus
    }
}

/// Result of scoring one answer against one question.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub score: u8,
    pub breakdown: ScoreBreakdown,
    pub feedback: FeedbackBand,
    pub topics_covered: Vec<String>,
    pub topics_missing: Vec<String>,
}

//
// ─── MATCHING ──────────────────────────────────────────────────────────────────
//

/// Lower-cased answer text plus its set of whole words.
struct AnswerTerms {
    lower: String,
    words: HashSet<String>,
}

impl AnswerTerms {
    fn new(answer: &str) -> Self {
        let lower = answer.to_lowercase();
        let words = split_words(&lower).map(str::to_owned).collect();
        Self { lower, words }
    }

    fn covers(&self, topic: &str) -> bool {
        let topic = topic.trim().to_lowercase();
        if topic.is_empty() {
            return false;
        }
        if self.lower.contains(&topic) {
            return true;
        }
        split_words(&topic).any(|word| self.words.contains(word))
    }
}

/// Whitespace-separated words with leading/trailing punctuation trimmed.
///
/// Inner punctuation survives, so `react.memo` and `box-sizing` stay whole.
fn split_words(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
        .filter(|w| !w.is_empty())
}

/// Whether `answer` mentions `topic`.
///
/// Case-insensitive. The topic counts as covered when the whole phrase occurs
/// anywhere in the answer, or when any single word of the phrase equals a
/// whole word of the answer.
#[must_use]
pub fn topic_is_covered(topic: &str, answer: &str) -> bool {
    AnswerTerms::new(answer).covers(topic)
}

//
// ─── SCORING ───────────────────────────────────────────────────────────────────
//

/// Length component: rewards answers up to 200 characters.
#[must_use]
pub fn length_score(answer: &str) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    let chars = answer.chars().count() as f64;
    (chars / LENGTH_SATURATION_CHARS * LENGTH_WEIGHT).min(LENGTH_WEIGHT)
}

/// Time component: full bonus under the limit, linear decay after, floored at 0.
#[must_use]
pub fn time_bonus(elapsed_secs: u32, time_limit_secs: u32) -> f64 {
    if elapsed_secs < time_limit_secs {
        return TIME_BONUS_MAX;
    }
    let overtime = f64::from(elapsed_secs - time_limit_secs);
    (TIME_BONUS_MAX - overtime / OVERTIME_SECS_PER_POINT).max(0.0)
}

/// Scores `answer` for `question` given the time spent on it.
///
/// Pure and total: any string, including an empty one, yields an evaluation.
#[must_use]
pub fn score_answer(answer: &str, question: &Question, elapsed_secs: u32) -> Evaluation {
    let terms = AnswerTerms::new(answer);

    let (topics_covered, topics_missing): (Vec<String>, Vec<String>) = question
        .expected_topics()
        .iter()
        .cloned()
        .partition(|topic| terms.covers(topic));

    let expected = question.expected_topics().len().max(1);
    #[allow(clippy::cast_precision_loss)]
    let topic = topics_covered.len() as f64 / expected as f64 * TOPIC_WEIGHT;

    let breakdown = ScoreBreakdown {
        topic: topic.min(TOPIC_WEIGHT),
        length: length_score(answer),
        time_bonus: time_bonus(elapsed_secs, question.time_limit_secs()),
    };

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let score = breakdown.total().round().clamp(0.0, 100.0) as u8;

    Evaluation {
        score,
        breakdown,
        feedback: FeedbackBand::for_score(score),
        topics_covered,
        topics_missing,
    }
}
