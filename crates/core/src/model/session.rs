use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::{Question, QuestionId, SessionId};
use crate::scoring::{Evaluation, FeedbackBand, ScoreBreakdown};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("session already completed")]
    Completed,

    #[error("answer is for question {got}, but the current question is {expected}")]
    QuestionMismatch { expected: QuestionId, got: QuestionId },
}

//
// ─── ANSWER RECORD ─────────────────────────────────────────────────────────────
//

/// A scored answer to one question of a session.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerRecord {
    pub question_id: QuestionId,
    /// Submitted text, trimmed.
    pub text: String,
    pub elapsed_secs: u32,
    pub score: u8,
    pub feedback: FeedbackBand,
    pub breakdown: ScoreBreakdown,
    pub topics_covered: Vec<String>,
    pub topics_missing: Vec<String>,
}

impl AnswerRecord {
    #[must_use]
    pub fn from_evaluation(
        question_id: QuestionId,
        text: impl Into<String>,
        elapsed_secs: u32,
        evaluation: Evaluation,
    ) -> Self {
        Self {
            question_id,
            text: text.into().trim().to_owned(),
            elapsed_secs,
            score: evaluation.score,
            feedback: evaluation.feedback,
            breakdown: evaluation.breakdown,
            topics_covered: evaluation.topics_covered,
            topics_missing: evaluation.topics_missing,
        }
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// One practice run: a fixed list of questions and the answers given so far.
///
/// `answers.len() <= questions.len()` always holds. The session is complete
/// once every question has an answer; at that point `ended_at` and
/// `overall_score` are set. A session with no questions is complete from
/// the start and never gets an overall score.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    id: SessionId,
    started_at: DateTime<Utc>,
    ended_at: Option<DateTime<Utc>>,
    questions: Vec<Question>,
    current_index: usize,
    answers: Vec<AnswerRecord>,
    overall_score: Option<u8>,
}

impl Session {
    #[must_use]
    pub fn new(id: SessionId, questions: Vec<Question>, started_at: DateTime<Utc>) -> Self {
        let ended_at = questions.is_empty().then_some(started_at);
        Self {
            id,
            started_at,
            ended_at,
            questions,
            current_index: 0,
            answers: Vec::new(),
            overall_score: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    #[must_use]
    pub fn overall_score(&self) -> Option<u8> {
        self.overall_score
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.answers.len() == self.questions.len()
    }

    /// The question awaiting an answer, or `None` once complete.
    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        if self.is_complete() {
            return None;
        }
        self.questions.get(self.current_index)
    }

    /// Looks up a question of this session by id.
    #[must_use]
    pub fn question(&self, id: &QuestionId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id() == id)
    }

    /// Appends the answer for the current question and advances.
    ///
    /// On the final question the cursor stays put, `ended_at` is set to
    /// `answered_at` and the overall score is computed.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if every question is answered, or
    /// `SessionError::QuestionMismatch` if the record is for another question.
    pub fn record_answer(
        &mut self,
        record: AnswerRecord,
        answered_at: DateTime<Utc>,
    ) -> Result<&AnswerRecord, SessionError> {
        let expected = self
            .current_question()
            .ok_or(SessionError::Completed)?
            .id()
            .clone();
        if record.question_id != expected {
            return Err(SessionError::QuestionMismatch {
                expected,
                got: record.question_id,
            });
        }

        self.answers.push(record);

        if self.current_index + 1 < self.questions.len() {
            self.current_index += 1;
        } else {
            self.ended_at = Some(answered_at);
            self.overall_score = mean_score(&self.answers);
        }

        self.answers.last().ok_or(SessionError::Completed)
    }
}

/// Rounded arithmetic mean of the recorded scores, `None` when empty.
fn mean_score(answers: &[AnswerRecord]) -> Option<u8> {
    if answers.is_empty() {
        return None;
    }
    let sum: u32 = answers.iter().map(|a| u32::from(a.score)).sum();
    #[allow(clippy::cast_precision_loss)]
    let mean = f64::from(sum) / answers.len() as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    Some(mean.round().clamp(0.0, 100.0) as u8)
}
