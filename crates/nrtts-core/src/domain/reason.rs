//! Reason codes carried by synthesis and playback outcomes.
//!
//! Both sets are closed. Adapters map every failure they can observe onto one
//! of these codes and never surface an error across the port boundary.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a synthesis call ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SynthesisReason {
    /// Audio was produced.
    Ok,
    /// Text was empty; nothing was sent.
    Empty,
    /// The backend client could not be constructed.
    BackendUnavailable,
    /// Transport, timeout, stream or file failure.
    RuntimeError,
    /// The backend refused or aborted the request.
    Canceled,
    /// The backend answered without audio.
    NoResult,
}

impl SynthesisReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Empty => "EMPTY",
            Self::BackendUnavailable => "BACKEND_UNAVAILABLE",
            Self::RuntimeError => "RUNTIME_ERROR",
            Self::Canceled => "CANCELED",
            Self::NoResult => "NO_RESULT",
        }
    }

    pub const fn is_ok(self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for SynthesisReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a playback attempt ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlaybackReason {
    Ok,
    /// The audio artifact does not exist.
    MissingFile,
    /// No audio output capability; playback skipped.
    PlayerMissing,
    /// Playback was attempted and failed.
    PlayError,
}

impl PlaybackReason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::MissingFile => "MISSING_FILE",
            Self::PlayerMissing => "PLAYER_MISSING",
            Self::PlayError => "PLAY_ERROR",
        }
    }
}

impl fmt::Display for PlaybackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
