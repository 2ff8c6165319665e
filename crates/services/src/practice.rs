//! Presentation-facing practice state.
//!
//! Wraps the [`InterviewController`] with the transient bits a front end
//! needs between submissions: the answer being composed, the live interim
//! transcript, the per-question timer and the speech recognizer.

use std::fmt;

use interview_core::model::{Category, Question};

use crate::error::SpeechError;
use crate::sessions::{InterviewController, SessionState, SubmitOutcome};
use crate::speech::{RecognizerConfig, SpeechEvent, SpeechEventSink, SpeechRecognizer};
use crate::timer::QuestionTimer;

/// Result of [`PracticeState::toggle_recording`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordingToggle {
    Started,
    Stopped,
    /// Speech input does not exist here; typed input still works.
    Unavailable,
    /// Nothing to record into.
    NoActiveQuestion,
    Failed(SpeechError),
}

pub struct PracticeState {
    controller: InterviewController,
    recognizer: Box<dyn SpeechRecognizer + Send>,
    recognizer_config: RecognizerConfig,
    speech_sink: SpeechEventSink,
    draft: String,
    interim: String,
    is_recording: bool,
    speech_available: bool,
    timer: QuestionTimer,
}

impl PracticeState {
    /// Recognizer events are delivered into `speech_sink`; the owner of the
    /// receiving half feeds them back through [`Self::handle_speech_event`].
    #[must_use]
    pub fn new(
        controller: InterviewController,
        recognizer: Box<dyn SpeechRecognizer + Send>,
        speech_sink: SpeechEventSink,
    ) -> Self {
        let speech_available = recognizer.is_supported();
        Self {
            controller,
            recognizer,
            recognizer_config: RecognizerConfig::default(),
            speech_sink,
            draft: String::new(),
            interim: String::new(),
            is_recording: false,
            speech_available,
            timer: QuestionTimer::new(),
        }
    }

    #[must_use]
    pub fn with_recognizer_config(mut self, config: RecognizerConfig) -> Self {
        self.recognizer_config = config;
        self
    }

    // ─── ACCESSORS ───

    #[must_use]
    pub fn controller(&self) -> &InterviewController {
        &self.controller
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.controller.state()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.controller.current_question()
    }

    #[must_use]
    pub fn draft(&self) -> &str {
        &self.draft
    }

    /// Latest unfinalized transcript. Never part of the answer.
    #[must_use]
    pub fn interim(&self) -> &str {
        &self.interim
    }

    #[must_use]
    pub fn is_recording(&self) -> bool {
        self.is_recording
    }

    #[must_use]
    pub fn speech_available(&self) -> bool {
        self.speech_available
    }

    #[must_use]
    pub fn timer(&self) -> &QuestionTimer {
        &self.timer
    }

    // ─── SESSION ───

    /// Begin a new session and start timing its first question.
    pub fn start(&mut self, question_count: usize, categories: &[Category]) -> SessionState {
        self.stop_recording();
        self.draft.clear();
        self.interim.clear();
        self.controller.create_session(question_count, categories);

        let state = self.controller.state();
        if state == SessionState::InProgress {
            self.timer.restart();
        } else {
            self.timer.stop();
            self.timer.reset();
        }
        state
    }

    pub fn type_text(&mut self, text: &str) {
        self.draft.push_str(text);
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// One-second heartbeat. Returns the elapsed seconds while a question
    /// is being answered.
    pub fn tick(&mut self) -> Option<u32> {
        (self.controller.state() == SessionState::InProgress).then(|| self.timer.tick())
    }

    /// Submit the draft with the time spent on the current question.
    pub fn submit(&mut self) -> SubmitOutcome {
        let outcome = self
            .controller
            .submit_answer(&self.draft, self.timer.elapsed_secs());

        match &outcome {
            SubmitOutcome::Ignored(_) => {}
            SubmitOutcome::Advanced { .. } => {
                self.draft.clear();
                self.interim.clear();
                self.timer.restart();
            }
            SubmitOutcome::Completed { .. } => {
                self.draft.clear();
                self.interim.clear();
                self.timer.stop();
                self.stop_recording();
            }
        }
        outcome
    }

    /// Discard the session and everything in flight.
    pub fn reset(&mut self) {
        self.stop_recording();
        self.controller.reset_session();
        self.draft.clear();
        self.interim.clear();
        self.timer.stop();
        self.timer.reset();
    }

    // ─── SPEECH ───

    pub fn toggle_recording(&mut self) -> RecordingToggle {
        if self.is_recording {
            self.stop_recording();
            return RecordingToggle::Stopped;
        }
        if !self.speech_available || !self.recognizer.is_supported() {
            self.speech_available = false;
            return RecordingToggle::Unavailable;
        }
        if self.controller.state() != SessionState::InProgress {
            return RecordingToggle::NoActiveQuestion;
        }

        match self
            .recognizer
            .start(&self.recognizer_config, self.speech_sink.clone())
        {
            Ok(()) => {
                self.is_recording = true;
                tracing::debug!(language = %self.recognizer_config.language, "speech capture started");
                RecordingToggle::Started
            }
            Err(SpeechError::Unsupported) => {
                self.speech_available = false;
                RecordingToggle::Unavailable
            }
            Err(err) => {
                tracing::warn!(error = %err, "speech capture failed to start");
                RecordingToggle::Failed(err)
            }
        }
    }

    /// Apply one recognizer event. Returns `false` when the event was
    /// dropped because no capture is active for the current question.
    pub fn handle_speech_event(&mut self, event: SpeechEvent) -> bool {
        if !self.is_recording || self.controller.state() != SessionState::InProgress {
            tracing::trace!(?event, "speech event dropped");
            return false;
        }

        match event {
            SpeechEvent::Result {
                text,
                is_final: false,
                ..
            } => {
                self.interim = text;
            }
            SpeechEvent::Result {
                text,
                is_final: true,
                confidence,
            } => {
                append_fragment(&mut self.draft, &text);
                self.interim.clear();
                tracing::debug!(chars = text.len(), ?confidence, "final transcript merged");
            }
            SpeechEvent::Error(code) => {
                self.is_recording = false;
                self.interim.clear();
                self.recognizer.stop();
                if code.is_fatal() {
                    self.speech_available = false;
                }
                tracing::warn!(%code, fatal = code.is_fatal(), "speech recognizer error");
            }
            SpeechEvent::End => {
                self.is_recording = false;
                self.interim.clear();
            }
        }
        true
    }

    fn stop_recording(&mut self) {
        if self.is_recording {
            self.recognizer.stop();
            self.is_recording = false;
            tracing::debug!("speech capture stopped");
        }
        self.interim.clear();
    }
}

impl fmt::Debug for PracticeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticeState")
            .field("controller", &self.controller)
            .field("draft_len", &self.draft.len())
            .field("is_recording", &self.is_recording)
            .field("speech_available", &self.speech_available)
            .field("timer", &self.timer)
            .finish_non_exhaustive()
    }
}

/// Append a finalized fragment, separated from existing text by a space.
fn append_fragment(draft: &mut String, fragment: &str) {
    let fragment = fragment.trim();
    if fragment.is_empty() {
        return;
    }
    if draft.chars().last().is_some_and(|c| !c.is_whitespace()) {
        draft.push(' ');
    }
    draft.push_str(fragment);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use catalog::QuestionCatalog;
    use interview_core::model::{Difficulty, QuestionId};
    use interview_core::time::fixed_clock;
    use tokio::sync::mpsc;

    use crate::speech::{ReplayRecognizer, SpeechErrorCode, UnsupportedRecognizer};

    fn build_controller(size: usize) -> InterviewController {
        let questions = (0..size)
            .map(|i| {
                Question::new(
                    QuestionId::new(format!("q-{i}")),
                    Category::Javascript,
                    Difficulty::Beginner,
                    "Explain closures.",
                    vec!["Scope".to_owned(), "Lexical environment".to_owned()],
                    60,
                    Vec::new(),
                )
                .unwrap()
            })
            .collect();
        let catalog = Arc::new(QuestionCatalog::new(questions).unwrap());
        InterviewController::new(fixed_clock(), catalog).with_seed(3)
    }

    fn practice(
        recognizer: Box<dyn SpeechRecognizer + Send>,
    ) -> (PracticeState, mpsc::UnboundedReceiver<SpeechEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (PracticeState::new(build_controller(2), recognizer, tx), rx)
    }

    fn pump(state: &mut PracticeState, rx: &mut mpsc::UnboundedReceiver<SpeechEvent>) {
        while let Ok(event) = rx.try_recv() {
            state.handle_speech_event(event);
        }
    }

    #[test]
    fn tick_only_counts_during_a_session() {
        let (mut state, _rx) = practice(Box::new(UnsupportedRecognizer));
        assert_eq!(state.tick(), None);

        state.start(2, &[]);
        state.tick();
        assert_eq!(state.tick(), Some(2));
    }

    #[test]
    fn submit_uses_timer_and_clears_draft() {
        let (mut state, _rx) = practice(Box::new(UnsupportedRecognizer));
        state.start(2, &[]);
        for _ in 0..7 {
            state.tick();
        }
        state.type_text("scope matters");

        let outcome = state.submit();
        assert_eq!(outcome.record().unwrap().elapsed_secs, 7);
        assert!(state.draft().is_empty());
        assert_eq!(state.timer().elapsed_secs(), 0);
        assert!(state.timer().is_running());

        state.type_text("lexical environment");
        assert!(matches!(state.submit(), SubmitOutcome::Completed { .. }));
        assert!(!state.timer().is_running());
        assert_eq!(state.tick(), None);
    }

    #[test]
    fn blank_draft_is_not_submitted() {
        let (mut state, _rx) = practice(Box::new(UnsupportedRecognizer));
        state.start(1, &[]);
        state.type_text("   ");
        assert!(!state.submit().is_accepted());
        assert_eq!(state.draft(), "   ");
    }

    #[test]
    fn unsupported_recognizer_disables_speech() {
        let (mut state, _rx) = practice(Box::new(UnsupportedRecognizer));
        assert!(!state.speech_available());
        state.start(1, &[]);
        assert_eq!(state.toggle_recording(), RecordingToggle::Unavailable);
        assert!(!state.is_recording());
    }

    #[test]
    fn recording_needs_an_active_question() {
        let (mut state, _rx) = practice(Box::new(ReplayRecognizer::from_transcript("hi")));
        assert_eq!(state.toggle_recording(), RecordingToggle::NoActiveQuestion);
    }

    #[test]
    fn final_fragments_append_and_interim_does_not() {
        let transcript = "closures capture scope\nvia the lexical environment";
        let (mut state, mut rx) = practice(Box::new(ReplayRecognizer::from_transcript(transcript)));
        state.start(2, &[]);
        state.type_text("I think");

        assert_eq!(state.toggle_recording(), RecordingToggle::Started);
        assert!(state.handle_speech_event(rx.try_recv().unwrap()));
        assert_eq!(state.interim(), "closures capture scope");
        assert_eq!(state.draft(), "I think");

        pump(&mut state, &mut rx);
        assert_eq!(
            state.draft(),
            "I think closures capture scope via the lexical environment"
        );
        assert!(state.interim().is_empty());
        assert!(state.is_recording());

        assert_eq!(state.toggle_recording(), RecordingToggle::Stopped);
        pump(&mut state, &mut rx);
        assert!(!state.is_recording());
        assert!(state.draft().ends_with("environment"));
    }

    #[test]
    fn events_outside_recording_are_dropped() {
        let (mut state, _rx) = practice(Box::new(UnsupportedRecognizer));
        state.start(1, &[]);
        assert!(!state.handle_speech_event(SpeechEvent::final_text("ghost", None)));
        assert!(state.draft().is_empty());
    }

    #[test]
    fn fatal_error_disables_speech_but_not_the_session() {
        let script = [SpeechEvent::Error(SpeechErrorCode::NotAllowed)];
        let (mut state, mut rx) = practice(Box::new(ReplayRecognizer::new(script)));
        state.start(1, &[]);

        assert_eq!(state.toggle_recording(), RecordingToggle::Started);
        pump(&mut state, &mut rx);
        assert!(!state.is_recording());
        assert!(!state.speech_available());
        assert_eq!(state.toggle_recording(), RecordingToggle::Unavailable);

        state.type_text("scope");
        assert!(state.submit().is_accepted());
    }

    #[test]
    fn transient_error_keeps_speech_available() {
        let script = [SpeechEvent::Error(SpeechErrorCode::NoSpeech)];
        let (mut state, mut rx) = practice(Box::new(ReplayRecognizer::new(script)));
        state.start(1, &[]);
        state.toggle_recording();
        pump(&mut state, &mut rx);
        assert!(!state.is_recording());
        assert!(state.speech_available());
    }

    #[test]
    fn reset_clears_everything() {
        let (mut state, mut rx) = practice(Box::new(ReplayRecognizer::from_transcript("a\nb")));
        state.start(2, &[]);
        state.toggle_recording();
        pump(&mut state, &mut rx);
        state.tick();

        state.reset();
        assert_eq!(state.state(), SessionState::NotStarted);
        assert!(state.draft().is_empty());
        assert!(!state.is_recording());
        assert_eq!(state.timer().elapsed_secs(), 0);
    }

    #[test]
    fn fragment_spacing() {
        let mut draft = String::new();
        append_fragment(&mut draft, "  hello ");
        append_fragment(&mut draft, "");
        append_fragment(&mut draft, "world");
        assert_eq!(draft, "hello world");

        let mut typed = "line\n".to_owned();
        append_fragment(&mut typed, "spoken");
        assert_eq!(typed, "line\nspoken");
    }
}
