//! Plain-text rendering for the terminal front end.
//!
//! Everything here returns `String` so the console loop decides where the
//! text goes (stdout normally, stderr when stdout carries JSON).

use std::fmt::Write as _;

use catalog::QuestionCatalog;
use interview_core::model::{AnswerRecord, Question};
use services::{
    OverallGrade, QuestionTimer, ResultsSummary, ScoreTone, SessionProgress, TimerStatus,
};

pub fn format_clock(seconds: u32) -> String {
    let minutes = seconds / 60;
    let remainder = seconds % 60;
    format!("{minutes}:{remainder:02}")
}

fn format_duration(seconds: u64) -> String {
    format!("{}m {}s", seconds / 60, seconds % 60)
}

fn tone_marker(tone: ScoreTone) -> &'static str {
    match tone {
        ScoreTone::Strong => "+",
        ScoreTone::Fair => "~",
        ScoreTone::Weak => "-",
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn question(progress: &SessionProgress, question: &Question) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "\nQuestion {} of {} ({}%)  [{}] [{}]",
        progress.position,
        progress.total,
        progress.percent(),
        question.category(),
        question.difficulty(),
    );
    let _ = writeln!(out, "{}", question.prompt());
    let _ = writeln!(out, "Consider covering:");
    for topic in question.expected_topics() {
        let _ = writeln!(out, "  - {topic}");
    }
    let _ = write!(
        out,
        "Suggested time: {}  (empty line submits, :help for commands)",
        format_clock(question.time_limit_secs())
    );
    out
}

pub fn timer(timer: &QuestionTimer, limit_secs: u32) -> String {
    let spent = format_clock(timer.elapsed_secs());
    match timer.status(limit_secs) {
        TimerStatus::OnTime => format!(
            "Time {spent}, remaining {}",
            format_clock(timer.remaining(limit_secs))
        ),
        TimerStatus::Warning => format!(
            "Time {spent}, overtime {} (wrap up)",
            format_clock(timer.overtime(limit_secs))
        ),
        TimerStatus::Overtime => format!(
            "Time {spent}, overtime {}",
            format_clock(timer.overtime(limit_secs))
        ),
    }
}

pub fn answer_feedback(record: &AnswerRecord) -> String {
    let mut out = format!("Score {}/100. {}", record.score, record.feedback.message());
    if !record.topics_covered.is_empty() {
        let _ = write!(out, "\n  covered: {}", record.topics_covered.join(", "));
    }
    if !record.topics_missing.is_empty() {
        let _ = write!(out, "\n  missing: {}", record.topics_missing.join(", "));
    }
    out
}

pub fn results(summary: &ResultsSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nInterview complete!");
    let _ = writeln!(
        out,
        "Overall {}/100 ({})",
        summary.overall_score,
        summary.grade.label()
    );
    let _ = writeln!(
        out,
        "Total time {}, {} answered, {}s average per question",
        format_duration(summary.total_duration_secs),
        summary.questions_answered,
        summary.average_secs_per_question,
    );

    for row in &summary.questions {
        let _ = writeln!(
            out,
            "\n{} Q{} [{}] [{}] {}/100",
            tone_marker(row.tone),
            row.number,
            row.category,
            row.difficulty,
            row.score
        );
        let _ = writeln!(out, "  {}", row.prompt);
        let _ = writeln!(out, "  {}", row.feedback);
        if !row.topics_covered.is_empty() {
            let _ = writeln!(out, "  covered: {}", row.topics_covered.join(", "));
        }
        if !row.topics_missing.is_empty() {
            let _ = writeln!(out, "  to improve: {}", row.topics_missing.join(", "));
        }
        let _ = writeln!(
            out,
            "  {}s spent, {} words",
            row.elapsed_secs,
            word_count(&row.answer)
        );
    }

    let _ = writeln!(out, "\nRecommendations:");
    for tip in recommendations(summary.grade) {
        let _ = writeln!(out, "  - {tip}");
    }
    let _ = write!(out, ":reset starts a new interview, :quit exits.");
    out
}

fn recommendations(grade: OverallGrade) -> Vec<&'static str> {
    let mut tips = Vec::with_capacity(4);
    if matches!(
        grade,
        OverallGrade::Fair | OverallGrade::NeedsImprovement
    ) {
        tips.push("Study core concepts: React, modern JavaScript and CSS fundamentals.");
    }
    tips.push("Practice explaining technical ideas clearly and concisely out loud.");
    tips.push("Build portfolio projects to get hands-on experience with more tools.");
    tips.push("Answer within the time limit: comprehensive but concise.");
    tips
}

pub fn catalog_listing(catalog: &QuestionCatalog) -> String {
    let mut out = String::new();
    for category in catalog.categories() {
        let _ = writeln!(out, "{category}");
        for question in catalog.by_category(category) {
            let _ = writeln!(
                out,
                "  {:<10} {:<12} {:>5}  {}",
                question.id().as_str(),
                question.difficulty().as_str(),
                format_clock(question.time_limit_secs()),
                question.prompt()
            );
        }
    }
    let _ = write!(out, "{} questions", catalog.len());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_pads_seconds() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(65), "1:05");
        assert_eq!(format_clock(600), "10:00");
        assert_eq!(format_duration(125), "2m 5s");
    }

    #[test]
    fn timer_switches_to_overtime() {
        let mut t = QuestionTimer::new();
        t.start();
        for _ in 0..70 {
            t.tick();
        }
        assert_eq!(timer(&t, 100), "Time 1:10, remaining 0:30");
        assert_eq!(timer(&t, 60), "Time 1:10, overtime 0:10 (wrap up)");
        assert_eq!(timer(&t, 30), "Time 1:10, overtime 0:40");
    }

    #[test]
    fn weak_grades_get_study_tip() {
        assert_eq!(recommendations(OverallGrade::Excellent).len(), 3);
        assert_eq!(recommendations(OverallGrade::Fair).len(), 4);
    }

    #[test]
    fn catalog_listing_counts_questions() {
        let catalog = QuestionCatalog::builtin().unwrap();
        let listing = catalog_listing(&catalog);
        assert!(listing.contains("tech-1"));
        assert!(listing.ends_with("11 questions"));
    }
}
