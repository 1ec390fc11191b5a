//! Playback sink port.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::domain::PlaybackReason;

/// Result of an attempt to render an audio artifact.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackOutcome {
    pub path: PathBuf,
    /// Whether audio actually reached an output device.
    pub played: bool,
    /// False only for a missing file or a failed attempt.
    pub success: bool,
    pub reason: PlaybackReason,
    pub used_player: Option<String>,
    pub started_at: Option<Instant>,
    /// Milliseconds between the caller's reference instant and playback start.
    pub start_offset_ms: Option<u64>,
    pub duration_seconds: Option<f64>,
    pub error: Option<String>,
}

impl PlaybackOutcome {
    pub fn missing_file(path: &Path) -> Self {
        Self {
            success: false,
            error: Some(format!("File not found: {}", path.display())),
            ..Self::base(path, PlaybackReason::MissingFile)
        }
    }

    /// No output capability; this is a graceful skip, not a failure.
    pub fn player_missing(path: &Path, duration_seconds: Option<f64>) -> Self {
        Self {
            duration_seconds,
            ..Self::base(path, PlaybackReason::PlayerMissing)
        }
    }

    pub fn played(
        path: &Path,
        player: &str,
        started_at: Instant,
        reference: Option<Instant>,
        duration_seconds: Option<f64>,
    ) -> Self {
        Self {
            played: true,
            used_player: Some(player.to_owned()),
            started_at: Some(started_at),
            start_offset_ms: reference.map(|r| offset_ms(r, started_at)),
            duration_seconds,
            ..Self::base(path, PlaybackReason::Ok)
        }
    }

    pub fn play_error(
        path: &Path,
        player: &str,
        error: impl Into<String>,
        duration_seconds: Option<f64>,
    ) -> Self {
        Self {
            success: false,
            used_player: Some(player.to_owned()),
            duration_seconds,
            error: Some(error.into()),
            ..Self::base(path, PlaybackReason::PlayError)
        }
    }

    fn base(path: &Path, reason: PlaybackReason) -> Self {
        Self {
            path: path.to_path_buf(),
            played: false,
            success: true,
            reason,
            used_player: None,
            started_at: None,
            start_offset_ms: None,
            duration_seconds: None,
            error: None,
        }
    }
}

fn offset_ms(reference: Instant, started_at: Instant) -> u64 {
    u64::try_from(started_at.saturating_duration_since(reference).as_millis()).unwrap_or(u64::MAX)
}

/// Renders an audio file on a local output device.
///
/// Blocking: returns once playback finished. Async callers should run it via
/// `spawn_blocking`.
pub trait PlaybackPort: Send + Sync {
    fn play(&self, path: &Path, reference: Option<Instant>) -> PlaybackOutcome;
}
