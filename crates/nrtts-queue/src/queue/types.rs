//! Queue item types.

use std::time::Instant;

use nrtts_core::{CancelledJob, DecisionKind, RequestId};

/// A job waiting for (or occupying) the active slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueuedJob {
    pub request_id: RequestId,
    /// Trimmed, non-empty text.
    pub text: String,
    /// When the job was admitted (for ordering/debugging).
    pub queued_at: Instant,
}

impl QueuedJob {
    /// Create a job with a freshly minted id.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            request_id: RequestId::new(),
            text: text.into(),
            queued_at: Instant::now(),
        }
    }

    pub(crate) fn cancel(self, at: Instant) -> CancelledJob {
        CancelledJob {
            request_id: self.request_id,
            text: self.text,
            cancelled_at: at,
        }
    }
}

/// Result of [`super::AdmissionQueue::admit`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Admission {
    /// The slot was idle; the caller must start this job.
    Start(QueuedJob),
    /// Appended to the FIFO; `depth` is the new pending length.
    Queued { depth: usize },
    Full,
    Stopped,
}

impl Admission {
    pub const fn decision(&self) -> DecisionKind {
        match self {
            Self::Start(_) => DecisionKind::ActiveStarted,
            Self::Queued { .. } => DecisionKind::Queued,
            Self::Full => DecisionKind::RejectedQueueFull,
            Self::Stopped => DecisionKind::RejectedStopped,
        }
    }
}

/// Point-in-time view of the queue for diagnostics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueueSnapshot {
    pub active: Option<RequestId>,
    /// Pending ids, head first.
    pub pending: Vec<RequestId>,
    pub completed: usize,
    pub cancelled: usize,
    pub max_queue: usize,
    pub stopped: bool,
}

impl QueueSnapshot {
    pub fn is_idle(&self) -> bool {
        self.active.is_none() && self.pending.is_empty()
    }
}
