//! Submission decisions.

use std::fmt;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::RequestId;

/// Outcome of a single admission attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionKind {
    /// The controller was idle; the job started immediately.
    ActiveStarted,
    /// A job was running; this one waits in the FIFO.
    Queued,
    /// A job was running and the FIFO was at capacity.
    RejectedQueueFull,
    /// The text was empty after trimming.
    RejectedEmpty,
    /// The controller was stopped before this submission.
    RejectedStopped,
}

impl DecisionKind {
    /// Wire label used in logs and evidence files.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ActiveStarted => "ACTIVE_STARTED",
            Self::Queued => "QUEUED",
            Self::RejectedQueueFull => "REJECTED_QUEUE_FULL",
            Self::RejectedEmpty => "REJECTED_EMPTY",
            Self::RejectedStopped => "REJECTED_STOPPED",
        }
    }

    /// Whether the submission will eventually produce a result (absent `stop()`).
    pub const fn is_admitted(self) -> bool {
        matches!(self, Self::ActiveStarted | Self::Queued)
    }
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record returned by `submit()`. Frozen once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionDecision {
    pub request_id: RequestId,
    /// Trimmed text, or the raw input for [`DecisionKind::RejectedEmpty`].
    pub text: String,
    pub decision: DecisionKind,
    /// Monotonic instant at which the decision was taken.
    pub timestamp: Instant,
}

impl SubmissionDecision {
    /// Build a decision stamped with the current instant.
    pub fn new(request_id: RequestId, text: impl Into<String>, decision: DecisionKind) -> Self {
        Self {
            request_id,
            text: text.into(),
            decision,
            timestamp: Instant::now(),
        }
    }
}
