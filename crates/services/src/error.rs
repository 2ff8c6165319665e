//! Shared error types for the services crate.

use thiserror::Error;

/// Errors emitted by speech recognizers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SpeechError {
    #[error("speech recognition is not supported in this environment")]
    Unsupported,
    #[error("speech recognition is already running")]
    AlreadyRunning,
    #[error("speech event receiver was dropped")]
    ChannelClosed,
}
