//! Synthesis backend port.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use crate::domain::SynthesisReason;
use crate::settings::{DEFAULT_SYNTHESIS_TIMEOUT, SpeechTarget};

// ── DTOs ─────────────────────────────────────────────────────────────────────

/// One text-to-speech call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisRequest {
    pub text: String,
    /// Base URL of the synthesis service (no trailing slash).
    pub host: String,
    pub voice: String,
    pub timeout: Duration,
}

impl SynthesisRequest {
    pub fn new(text: impl Into<String>, target: &SpeechTarget) -> Self {
        Self {
            text: text.into(),
            host: target.host().to_owned(),
            voice: target.voice().to_owned(),
            timeout: DEFAULT_SYNTHESIS_TIMEOUT,
        }
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Structured result of a synthesis call.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOutcome {
    pub text: String,
    pub success: bool,
    pub reason: SynthesisReason,
    /// Milliseconds from call start to first audio (or to call end).
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
    pub voice: String,
    pub host: String,
    pub audio_path: Option<PathBuf>,
    /// When the backend started working on the request.
    pub started_at: Option<Instant>,
    /// When the first audio bytes arrived.
    pub first_audio_at: Option<Instant>,
}

impl SynthesisOutcome {
    /// Audio was written to `audio_path`.
    pub fn succeeded(request: &SynthesisRequest, audio_path: PathBuf, latency_ms: u64) -> Self {
        Self {
            success: true,
            reason: SynthesisReason::Ok,
            latency_ms: Some(latency_ms),
            audio_path: Some(audio_path),
            ..Self::blank(request, SynthesisReason::Ok)
        }
    }

    /// The call failed for `reason`.
    pub fn failed(
        request: &SynthesisRequest,
        reason: SynthesisReason,
        error: impl Into<String>,
    ) -> Self {
        Self {
            error: Some(error.into()),
            ..Self::blank(request, reason)
        }
    }

    #[must_use]
    pub const fn with_latency(mut self, latency_ms: Option<u64>) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    #[must_use]
    pub const fn with_first_audio_at(mut self, first_audio_at: Instant) -> Self {
        self.first_audio_at = Some(first_audio_at);
        self
    }

    #[must_use]
    pub const fn with_started_at(mut self, started_at: Instant) -> Self {
        self.started_at = Some(started_at);
        self
    }

    fn blank(request: &SynthesisRequest, reason: SynthesisReason) -> Self {
        Self {
            text: request.text.clone(),
            success: false,
            reason,
            latency_ms: None,
            error: None,
            voice: request.voice.clone(),
            host: request.host.clone(),
            audio_path: None,
            started_at: None,
            first_audio_at: None,
        }
    }
}

// ── Port ─────────────────────────────────────────────────────────────────────

/// Converts text into an audio artifact.
///
/// Implementations must not panic and must not return early on failure:
/// every failure mode is expressed through [`SynthesisOutcome::reason`].
#[async_trait]
pub trait SynthesisPort: Send + Sync {
    async fn synthesize(&self, request: &SynthesisRequest) -> SynthesisOutcome;
}
