//! Failure classification for the HTTP synthesizer.
//!
//! These never leave the adapter as `Err`: each variant maps onto a
//! [`SynthesisReason`] and its message becomes the outcome's error detail.

use std::path::PathBuf;

use nrtts_core::SynthesisReason;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpeechError {
    /// The HTTP client or endpoint URL could not be constructed.
    #[error("Synthesis backend unavailable: {0}")]
    Client(String),

    /// Connection, TLS or timeout failure before a response arrived.
    #[error("Request failed: {0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body broke off mid-stream.
    #[error("Audio stream interrupted: {0}")]
    Stream(String),

    #[error("Failed to write audio to {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    /// Success status with an empty body.
    #[error("Synthesis returned no audio")]
    EmptyAudio,
}

impl SpeechError {
    pub(crate) fn io(path: &std::path::Path, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }

    /// Reason code reported for this failure.
    pub const fn reason(&self) -> SynthesisReason {
        match self {
            Self::Client(_) => SynthesisReason::BackendUnavailable,
            Self::Transport(_) | Self::Stream(_) | Self::Io { .. } => SynthesisReason::RuntimeError,
            Self::Status { .. } => SynthesisReason::Canceled,
            Self::EmptyAudio => SynthesisReason::NoResult,
        }
    }
}
