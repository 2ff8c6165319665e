use chrono::{DateTime, Utc};
use serde::Serialize;

use interview_core::model::{Category, Difficulty, QuestionId, Session, SessionId};
use interview_core::scoring::FeedbackBand;
use interview_core::time::whole_seconds_between;

/// Label for the overall interview score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OverallGrade {
    Excellent,
    VeryGood,
    Good,
    Fair,
    NeedsImprovement,
}

impl OverallGrade {
    #[must_use]
    pub fn for_score(score: u8) -> Self {
        match score {
            90.. => OverallGrade::Excellent,
            80..=89 => OverallGrade::VeryGood,
            70..=79 => OverallGrade::Good,
            60..=69 => OverallGrade::Fair,
            _ => OverallGrade::NeedsImprovement,
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            OverallGrade::Excellent => "Excellent",
            OverallGrade::VeryGood => "Very Good",
            OverallGrade::Good => "Good",
            OverallGrade::Fair => "Fair",
            OverallGrade::NeedsImprovement => "Needs Improvement",
        }
    }
}

/// Coarse colour band for a single score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreTone {
    Strong,
    Fair,
    Weak,
}

impl ScoreTone {
    #[must_use]
    pub fn for_score(score: u8) -> Self {
        match score {
            80.. => ScoreTone::Strong,
            60..=79 => ScoreTone::Fair,
            _ => ScoreTone::Weak,
        }
    }
}

/// One row of the results breakdown.
///
/// Presentation-agnostic: no pre-formatted strings beyond the fixed
/// feedback message, so the shell decides how to lay it out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionResult {
    /// 1-based position in the session.
    pub number: usize,
    pub question_id: QuestionId,
    pub category: Category,
    pub difficulty: Difficulty,
    pub prompt: String,
    pub answer: String,
    pub score: u8,
    pub tone: ScoreTone,
    pub feedback_band: FeedbackBand,
    pub feedback: &'static str,
    pub elapsed_secs: u32,
    pub topics_covered: Vec<String>,
    pub topics_missing: Vec<String>,
}

/// Aggregate results of a completed session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsSummary {
    pub session_id: SessionId,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub overall_score: u8,
    pub grade: OverallGrade,
    pub tone: ScoreTone,
    pub total_duration_secs: u64,
    pub questions_answered: usize,
    pub average_secs_per_question: u32,
    pub questions: Vec<QuestionResult>,
}

impl ResultsSummary {
    /// Summarise a completed session.
    ///
    /// Returns `None` while the session is in progress, or when it had no
    /// questions and therefore no overall score.
    #[must_use]
    pub fn from_session(session: &Session) -> Option<Self> {
        if !session.is_complete() {
            return None;
        }
        let overall_score = session.overall_score()?;
        let ended_at = session.ended_at()?;

        let questions: Vec<QuestionResult> = session
            .answers()
            .iter()
            .enumerate()
            .filter_map(|(i, answer)| {
                let question = session.question(&answer.question_id)?;
                Some(QuestionResult {
                    number: i + 1,
                    question_id: answer.question_id.clone(),
                    category: question.category(),
                    difficulty: question.difficulty(),
                    prompt: question.prompt().to_owned(),
                    answer: answer.text.clone(),
                    score: answer.score,
                    tone: ScoreTone::for_score(answer.score),
                    feedback_band: answer.feedback,
                    feedback: answer.feedback.message(),
                    elapsed_secs: answer.elapsed_secs,
                    topics_covered: answer.topics_covered.clone(),
                    topics_missing: answer.topics_missing.clone(),
                })
            })
            .collect();

        let answered = session.answers().len();
        let total_elapsed: u64 = session
            .answers()
            .iter()
            .map(|a| u64::from(a.elapsed_secs))
            .sum();
        let average = (total_elapsed * 2 + answered as u64) / (answered.max(1) as u64 * 2);

        Some(Self {
            session_id: session.id(),
            started_at: session.started_at(),
            ended_at,
            overall_score,
            grade: OverallGrade::for_score(overall_score),
            tone: ScoreTone::for_score(overall_score),
            total_duration_secs: whole_seconds_between(session.started_at(), ended_at),
            questions_answered: answered,
            average_secs_per_question: u32::try_from(average).unwrap_or(u32::MAX),
            questions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use interview_core::model::{AnswerRecord, Question};
    use interview_core::scoring::score_answer;
    use interview_core::time::fixed_now;

    fn build_question(id: &str) -> Question {
        Question::new(
            QuestionId::new(id),
            Category::Behavioral,
            Difficulty::Beginner,
            format!("Tell me about {id}."),
            vec!["Results".to_owned(), "Team collaboration".to_owned()],
            100,
            Vec::new(),
        )
        .unwrap()
    }

    fn answer(session: &mut Session, text: &str, elapsed: u32, at: DateTime<Utc>) {
        let question = session.current_question().unwrap().clone();
        let eval = score_answer(text, &question, elapsed);
        let record = AnswerRecord::from_evaluation(question.id().clone(), text, elapsed, eval);
        session.record_answer(record, at).unwrap();
    }

    #[test]
    fn grade_thresholds() {
        assert_eq!(OverallGrade::for_score(95), OverallGrade::Excellent);
        assert_eq!(OverallGrade::for_score(85), OverallGrade::VeryGood);
        assert_eq!(OverallGrade::for_score(70), OverallGrade::Good);
        assert_eq!(OverallGrade::for_score(60), OverallGrade::Fair);
        assert_eq!(OverallGrade::for_score(59), OverallGrade::NeedsImprovement);
        assert_eq!(OverallGrade::VeryGood.label(), "Very Good");
        assert_eq!(ScoreTone::for_score(80), ScoreTone::Strong);
        assert_eq!(ScoreTone::for_score(65), ScoreTone::Fair);
        assert_eq!(ScoreTone::for_score(10), ScoreTone::Weak);
    }

    #[test]
    fn in_progress_session_has_no_summary() {
        let session = Session::new(SessionId::generate(), vec![build_question("a")], fixed_now());
        assert!(ResultsSummary::from_session(&session).is_none());
    }

    #[test]
    fn summary_collects_rows_and_timing() {
        let start = fixed_now();
        let mut session = Session::new(
            SessionId::generate(),
            vec![build_question("a"), build_question("b")],
            start,
        );
        answer(&mut session, "the results were great", 40, start + Duration::seconds(40));
        answer(&mut session, "team work", 85, start + Duration::seconds(125));

        let summary = ResultsSummary::from_session(&session).unwrap();
        assert_eq!(summary.questions_answered, 2);
        assert_eq!(summary.total_duration_secs, 125);
        // (40 + 85) / 2 = 62.5
        assert_eq!(summary.average_secs_per_question, 63);
        assert_eq!(summary.overall_score, session.overall_score().unwrap());
        assert_eq!(summary.questions[0].number, 1);
        assert_eq!(summary.questions[0].topics_covered, vec!["Results"]);
        assert_eq!(summary.questions[1].topics_covered, vec!["Team collaboration"]);
        assert_eq!(
            summary.questions[1].feedback,
            summary.questions[1].feedback_band.message()
        );
    }

    #[test]
    fn summary_serializes_to_json() {
        let mut session =
            Session::new(SessionId::generate(), vec![build_question("a")], fixed_now());
        answer(&mut session, "results", 10, fixed_now());

        let summary = ResultsSummary::from_session(&session).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["questions"][0]["category"], "behavioral");
        assert_eq!(json["questions_answered"], 1);
        assert!(json["grade"].is_string());
    }
}
