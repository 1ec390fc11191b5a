//! Records appended by the admission controller.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use super::{RequestId, SynthesisReason};

/// Outcome of one admitted job, appended once its synthesis call returns.
///
/// Backend fields (`success`, `latency_ms`, `audio_path`, `reason`, `error`)
/// are copied verbatim from the synthesis outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedResult {
    pub request_id: RequestId,
    pub text: String,
    pub success: bool,
    pub latency_ms: Option<u64>,
    pub audio_path: Option<PathBuf>,
    pub reason: SynthesisReason,
    pub error: Option<String>,
    pub started_at: Instant,
    pub completed_at: Instant,
}

impl CompletedResult {
    /// Wall time the job spent in the active slot.
    pub fn elapsed(&self) -> Duration {
        self.completed_at.saturating_duration_since(self.started_at)
    }
}

/// A queued job that was stranded by `stop()` and never executed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancelledJob {
    pub request_id: RequestId,
    pub text: String,
    pub cancelled_at: Instant,
}
