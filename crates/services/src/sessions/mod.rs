mod plan;
mod progress;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use plan::{Selection, SessionBuilder, SessionPlan};
pub use progress::SessionProgress;
pub use view::{OverallGrade, QuestionResult, ResultsSummary, ScoreTone};
pub use workflow::{IgnoredReason, InterviewController, SessionState, SubmitOutcome};
