#![forbid(unsafe_code)]

pub mod error;
pub mod practice;
pub mod sessions;
pub mod speech;
pub mod timer;

pub use interview_core::Clock;

pub use error::SpeechError;
pub use practice::{PracticeState, RecordingToggle};
pub use sessions::{
    IgnoredReason, InterviewController, OverallGrade, QuestionResult, ResultsSummary, ScoreTone,
    SessionBuilder, SessionPlan, SessionProgress, SessionState, SubmitOutcome,
};
pub use speech::{
    RecognizerConfig, ReplayRecognizer, SpeechErrorCode, SpeechEvent, SpeechEventSink,
    SpeechRecognizer, UnsupportedRecognizer,
};
pub use timer::{QuestionTimer, TimerStatus};
