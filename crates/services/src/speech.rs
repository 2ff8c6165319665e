//! Speech-to-text collaborator interface.
//!
//! The recognizer itself lives outside this system. It is started and
//! stopped through [`SpeechRecognizer`] and reports back by pushing
//! [`SpeechEvent`]s into the channel handed to `start`. Only final results
//! are ever merged into an answer; interim ones are display-only.

use std::collections::VecDeque;
use std::fmt;

use tokio::sync::mpsc;

use crate::error::SpeechError;

/// Where a recognizer delivers its events.
pub type SpeechEventSink = mpsc::UnboundedSender<SpeechEvent>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognizerConfig {
    /// BCP 47 language tag.
    pub language: String,
    pub interim_results: bool,
    pub continuous: bool,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            language: "en-US".to_owned(),
            interim_results: true,
            continuous: true,
        }
    }
}

/// Error reported by a recognizer mid-capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechErrorCode {
    NoSpeech,
    Aborted,
    AudioCapture,
    Network,
    NotAllowed,
    ServiceNotAllowed,
    LanguageNotSupported,
    Other(String),
}

impl SpeechErrorCode {
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "no-speech" => Self::NoSpeech,
            "aborted" => Self::Aborted,
            "audio-capture" => Self::AudioCapture,
            "network" => Self::Network,
            "not-allowed" => Self::NotAllowed,
            "service-not-allowed" => Self::ServiceNotAllowed,
            "language-not-supported" => Self::LanguageNotSupported,
            other => Self::Other(other.to_owned()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::NoSpeech => "no-speech",
            Self::Aborted => "aborted",
            Self::AudioCapture => "audio-capture",
            Self::Network => "network",
            Self::NotAllowed => "not-allowed",
            Self::ServiceNotAllowed => "service-not-allowed",
            Self::LanguageNotSupported => "language-not-supported",
            Self::Other(code) => code,
        }
    }

    /// Permission-class errors: retrying in this process will not help.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::NotAllowed | Self::ServiceNotAllowed)
    }
}

impl fmt::Display for SpeechErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SpeechEvent {
    Result {
        text: String,
        is_final: bool,
        /// In `[0, 1]` when the recognizer reports one.
        confidence: Option<f32>,
    },
    Error(SpeechErrorCode),
    /// Capture stopped, on request or on its own.
    End,
}

impl SpeechEvent {
    #[must_use]
    pub fn interim(text: impl Into<String>) -> Self {
        Self::Result {
            text: text.into(),
            is_final: false,
            confidence: None,
        }
    }

    #[must_use]
    pub fn final_text(text: impl Into<String>, confidence: Option<f32>) -> Self {
        Self::Result {
            text: text.into(),
            is_final: true,
            confidence: confidence.map(|c| c.clamp(0.0, 1.0)),
        }
    }

    fn is_final_result(&self) -> bool {
        matches!(self, Self::Result { is_final: true, .. })
    }
}

/// Start/stop control over an external speech-to-text capability.
///
/// `start` and `stop` are fire-and-forget. Failures during capture arrive
/// as `SpeechEvent::Error` followed by `SpeechEvent::End`.
pub trait SpeechRecognizer {
    /// Whether the capability exists in this environment at all.
    fn is_supported(&self) -> bool;

    /// Begin capture, delivering events into `sink`.
    ///
    /// # Errors
    ///
    /// Returns `SpeechError::Unsupported` when the capability is missing and
    /// `SpeechError::AlreadyRunning` if capture is in progress.
    fn start(&mut self, config: &RecognizerConfig, sink: SpeechEventSink)
    -> Result<(), SpeechError>;

    /// Stop capture. Events already delivered stay delivered.
    fn stop(&mut self);
}

/// Recognizer for environments without speech support.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedRecognizer;

impl SpeechRecognizer for UnsupportedRecognizer {
    fn is_supported(&self) -> bool {
        false
    }

    fn start(
        &mut self,
        _config: &RecognizerConfig,
        _sink: SpeechEventSink,
    ) -> Result<(), SpeechError> {
        Err(SpeechError::Unsupported)
    }

    fn stop(&mut self) {}
}

/// Recognizer that plays back a fixed script of events.
///
/// In continuous mode one `start` delivers the whole remaining script and
/// capture stays open until `stop`. Otherwise each `start` delivers events up
/// to and including the next final result, then ends.
#[derive(Debug, Default)]
pub struct ReplayRecognizer {
    script: VecDeque<SpeechEvent>,
    sink: Option<SpeechEventSink>,
}

impl ReplayRecognizer {
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = SpeechEvent>) -> Self {
        Self {
            script: script.into_iter().collect(),
            sink: None,
        }
    }

    /// One utterance per non-blank line: an interim result, then the final.
    #[must_use]
    pub fn from_transcript(transcript: &str) -> Self {
        let script = transcript
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .flat_map(|line| [SpeechEvent::interim(line), SpeechEvent::final_text(line, Some(1.0))]);
        Self::new(script)
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.sink.is_some()
    }
}

impl SpeechRecognizer for ReplayRecognizer {
    fn is_supported(&self) -> bool {
        true
    }

    fn start(
        &mut self,
        config: &RecognizerConfig,
        sink: SpeechEventSink,
    ) -> Result<(), SpeechError> {
        if self.sink.is_some() {
            return Err(SpeechError::AlreadyRunning);
        }

        while let Some(event) = self.script.pop_front() {
            let is_final = event.is_final_result();
            let wanted = config.interim_results
                || !matches!(event, SpeechEvent::Result { is_final: false, .. });
            if wanted {
                sink.send(event).map_err(|_| SpeechError::ChannelClosed)?;
            }
            if is_final && !config.continuous {
                break;
            }
        }

        if config.continuous {
            self.sink = Some(sink);
        } else {
            sink.send(SpeechEvent::End)
                .map_err(|_| SpeechError::ChannelClosed)?;
        }
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(sink) = self.sink.take() {
            // The receiver may already be gone during shutdown.
            let _ = sink.send(SpeechEvent::End);
        }
    }
}
