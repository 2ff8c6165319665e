use std::fmt;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

use catalog::QuestionCatalog;
use interview_core::model::{AnswerRecord, Category, Difficulty, Question, Session, SessionId};
use interview_core::scoring::score_answer;

use super::plan::SessionBuilder;
use super::progress::SessionProgress;
use super::view::ResultsSummary;
use crate::Clock;

/// Lifecycle of the controller's current session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Complete,
}

/// Why a submission left the session untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    NoSession,
    BlankAnswer,
    AlreadyComplete,
}

/// Result of submitting an answer.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Nothing changed.
    Ignored(IgnoredReason),
    /// Answer recorded; the session moved on to `next_index`.
    Advanced {
        record: AnswerRecord,
        next_index: usize,
    },
    /// Answer recorded for the final question; the session is complete.
    Completed {
        record: AnswerRecord,
        overall_score: Option<u8>,
    },
}

impl SubmitOutcome {
    #[must_use]
    pub fn record(&self) -> Option<&AnswerRecord> {
        match self {
            SubmitOutcome::Ignored(_) => None,
            SubmitOutcome::Advanced { record, .. } | SubmitOutcome::Completed { record, .. } => {
                Some(record)
            }
        }
    }

    #[must_use]
    pub fn is_accepted(&self) -> bool {
        !matches!(self, SubmitOutcome::Ignored(_))
    }
}

/// Drives one practice session at a time: creation, answering, reset.
///
/// Holds at most one `Session`. All mutation goes through `&mut self`, so
/// callers always observe a single consistent version.
pub struct InterviewController {
    clock: Clock,
    catalog: Arc<QuestionCatalog>,
    rng: Box<dyn RngCore + Send>,
    difficulty: Option<Difficulty>,
    session: Option<Session>,
}

impl InterviewController {
    /// Controller with an OS-seeded random source.
    #[must_use]
    pub fn new(clock: Clock, catalog: Arc<QuestionCatalog>) -> Self {
        Self {
            clock,
            catalog,
            rng: Box::new(StdRng::from_os_rng()),
            difficulty: None,
            session: None,
        }
    }

    /// Replace the random source used for question sampling.
    #[must_use]
    pub fn with_rng(mut self, rng: impl RngCore + Send + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Use a seeded `StdRng` so sampling is reproducible.
    #[must_use]
    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    /// Only pick questions of this difficulty.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Option<Difficulty>) -> Self {
        self.difficulty = difficulty;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        match &self.session {
            None => SessionState::NotStarted,
            Some(s) if s.is_complete() => SessionState::Complete,
            Some(_) => SessionState::InProgress,
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.session.as_ref().and_then(Session::current_question)
    }

    #[must_use]
    pub fn progress(&self) -> Option<SessionProgress> {
        self.session.as_ref().map(SessionProgress::of)
    }

    /// Results of the finished session, if there is one with questions.
    #[must_use]
    pub fn results(&self) -> Option<ResultsSummary> {
        self.session.as_ref().and_then(ResultsSummary::from_session)
    }

    /// Start a new session, replacing any current one.
    ///
    /// See [`SessionBuilder::build`] for how questions are chosen. A
    /// `question_count` of zero yields a session that is already complete.
    pub fn create_session(&mut self, question_count: usize, categories: &[Category]) -> &Session {
        let plan = SessionBuilder::new(&self.catalog)
            .with_categories(categories)
            .with_difficulty(self.difficulty)
            .build(question_count, self.rng.as_mut());

        let session = Session::new(SessionId::generate(), plan.questions, self.clock.now());
        tracing::info!(
            session_id = %session.id(),
            requested = question_count,
            selected = session.questions().len(),
            selection = ?plan.selection,
            "interview session created"
        );
        self.session.insert(session)
    }

    /// Score `answer_text` against the current question and record it.
    ///
    /// Blank answers, a missing session, and a completed session are
    /// ignored without touching state.
    pub fn submit_answer(&mut self, answer_text: &str, elapsed_secs: u32) -> SubmitOutcome {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!("submission ignored: no active session");
            return SubmitOutcome::Ignored(IgnoredReason::NoSession);
        };

        let text = answer_text.trim();
        if text.is_empty() {
            tracing::debug!(session_id = %session.id(), "submission ignored: blank answer");
            return SubmitOutcome::Ignored(IgnoredReason::BlankAnswer);
        }

        let record = {
            let Some(question) = session.current_question() else {
                tracing::debug!(session_id = %session.id(), "submission ignored: session complete");
                return SubmitOutcome::Ignored(IgnoredReason::AlreadyComplete);
            };
            let evaluation = score_answer(text, question, elapsed_secs);
            AnswerRecord::from_evaluation(question.id().clone(), text, elapsed_secs, evaluation)
        };

        let recorded = session.record_answer(record, self.clock.now()).cloned();
        let record = match recorded {
            Ok(record) => record,
            Err(err) => {
                tracing::warn!(session_id = %session.id(), error = %err, "answer not recorded");
                return SubmitOutcome::Ignored(IgnoredReason::AlreadyComplete);
            }
        };

        tracing::debug!(
            session_id = %session.id(),
            question_id = %record.question_id,
            score = record.score,
            covered = record.topics_covered.len(),
            missing = record.topics_missing.len(),
            elapsed_secs,
            "answer scored"
        );

        if session.is_complete() {
            let overall_score = session.overall_score();
            tracing::info!(
                session_id = %session.id(),
                answers = session.answers().len(),
                overall_score = ?overall_score,
                "interview session completed"
            );
            SubmitOutcome::Completed {
                record,
                overall_score,
            }
        } else {
            SubmitOutcome::Advanced {
                record,
                next_index: session.current_index(),
            }
        }
    }

    /// Discard the current session, returning to `NotStarted`.
    pub fn reset_session(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::info!(session_id = %session.id(), "interview session discarded");
        }
    }
}

impl fmt::Debug for InterviewController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterviewController")
            .field("clock", &self.clock)
            .field("catalog_len", &self.catalog.len())
            .field("difficulty", &self.difficulty)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use interview_core::model::QuestionId;
    use interview_core::time::{fixed_clock, fixed_now};
    use std::collections::HashSet;

    fn build_question(id: &str, category: Category, topics: &[&str]) -> Question {
        Question::new(
            QuestionId::new(id),
            category,
            Difficulty::Intermediate,
            format!("Prompt {id}"),
            topics.iter().map(|t| (*t).to_owned()).collect(),
            120,
            Vec::new(),
        )
        .unwrap()
    }

    fn build_catalog(size: usize) -> Arc<QuestionCatalog> {
        let questions = (0..size)
            .map(|i| {
                let category = if i % 2 == 0 { Category::Css } else { Category::React };
                build_question(&format!("q-{i}"), category, &["Padding", "Margin"])
            })
            .collect();
        Arc::new(QuestionCatalog::new(questions).unwrap())
    }

    fn controller(size: usize) -> InterviewController {
        InterviewController::new(fixed_clock(), build_catalog(size)).with_seed(11)
    }

    #[test]
    fn starts_not_started() {
        let ctl = controller(3);
        assert_eq!(ctl.state(), SessionState::NotStarted);
        assert!(ctl.session().is_none());
        assert!(ctl.progress().is_none());
    }

    #[test]
    fn create_random_session_of_three() {
        let mut ctl = controller(12);
        let session = ctl.create_session(3, &[]);

        assert_eq!(session.questions().len(), 3);
        let ids: HashSet<_> = session.questions().iter().map(|q| q.id().clone()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.started_at(), fixed_now());
        assert_eq!(session.ended_at(), None);
        assert_eq!(ctl.state(), SessionState::InProgress);
    }

    #[test]
    fn create_caps_at_catalog_size() {
        let mut ctl = controller(12);
        assert_eq!(ctl.create_session(100, &[]).questions().len(), 12);
    }

    #[test]
    fn seeded_controllers_pick_the_same_questions() {
        let mut a = controller(12);
        let mut b = controller(12);
        let ids_a: Vec<_> = a
            .create_session(4, &[])
            .questions()
            .iter()
            .map(|q| q.id().clone())
            .collect();
        let ids_b: Vec<_> = b
            .create_session(4, &[])
            .questions()
            .iter()
            .map(|q| q.id().clone())
            .collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn create_with_filter_uses_catalog_order() {
        let mut ctl = controller(6);
        let session = ctl.create_session(2, &[Category::React]);
        let ids: Vec<_> = session.questions().iter().map(|q| q.id().as_str()).collect();
        assert_eq!(ids, vec!["q-1", "q-3"]);
    }

    #[test]
    fn zero_count_is_immediately_complete() {
        let mut ctl = controller(4);
        let session = ctl.create_session(0, &[]);
        assert!(session.questions().is_empty());
        assert_eq!(ctl.state(), SessionState::Complete);
        assert!(ctl.results().is_none());
        assert_eq!(
            ctl.submit_answer("anything", 1),
            SubmitOutcome::Ignored(IgnoredReason::AlreadyComplete)
        );
    }

    #[test]
    fn submit_without_session_is_ignored() {
        let mut ctl = controller(2);
        assert_eq!(
            ctl.submit_answer("padding", 5),
            SubmitOutcome::Ignored(IgnoredReason::NoSession)
        );
    }

    #[test]
    fn blank_submission_changes_nothing() {
        let mut ctl = controller(2);
        ctl.create_session(2, &[]);
        let before = ctl.session().cloned();

        let outcome = ctl.submit_answer("   \n\t", 5);
        assert_eq!(outcome, SubmitOutcome::Ignored(IgnoredReason::BlankAnswer));
        assert_eq!(ctl.session().cloned(), before);
    }

    #[test]
    fn submissions_advance_then_complete() {
        let mut ctl = controller(2);
        ctl.create_session(2, &[]);

        let first = ctl.submit_answer("  padding and margin  ", 30);
        let SubmitOutcome::Advanced { record, next_index } = first.clone() else {
            panic!("expected Advanced, got {first:?}");
        };
        assert_eq!(next_index, 1);
        assert_eq!(record.text, "padding and margin");
        assert_eq!(record.breakdown.topic, 60.0);
        assert_eq!(ctl.state(), SessionState::InProgress);
        assert_eq!(ctl.session().unwrap().overall_score(), None);

        let second = ctl.submit_answer("nothing relevant", 500);
        let SubmitOutcome::Completed { overall_score, .. } = second.clone() else {
            panic!("expected Completed, got {second:?}");
        };
        let session = ctl.session().unwrap();
        let scores: Vec<u32> = session.answers().iter().map(|a| u32::from(a.score)).collect();
        let mean = f64::from(scores.iter().sum::<u32>()) / scores.len() as f64;
        assert_eq!(overall_score, Some(mean.round() as u8));
        assert_eq!(session.ended_at(), Some(fixed_now()));
        assert_eq!(ctl.state(), SessionState::Complete);
        assert!(ctl.results().is_some());

        let after = ctl.submit_answer("more", 1);
        assert_eq!(after, SubmitOutcome::Ignored(IgnoredReason::AlreadyComplete));
        assert_eq!(ctl.session().unwrap().answers().len(), 2);
    }

    #[test]
    fn reset_returns_to_not_started() {
        let mut ctl = controller(3);
        ctl.create_session(3, &[]);
        ctl.submit_answer("padding", 3);
        ctl.reset_session();
        assert_eq!(ctl.state(), SessionState::NotStarted);

        let fresh = ctl.create_session(1, &[]);
        assert!(fresh.answers().is_empty());
    }

    #[test]
    fn answers_never_outnumber_questions() {
        let mut ctl = controller(3);
        ctl.create_session(3, &[]);
        for _ in 0..10 {
            ctl.submit_answer("margin", 10);
            let session = ctl.session().unwrap();
            assert!(session.answers().len() <= session.questions().len());
        }
        assert_eq!(ctl.session().unwrap().answers().len(), 3);
    }
}
