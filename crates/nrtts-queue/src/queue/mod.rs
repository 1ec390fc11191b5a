//! Admission queue state machine.
//!
//! # Design
//!
//! - Pure synchronous state machine (no async, no IO, no tracing)
//! - The caller (`AdmissionController`) is responsible for synchronization
//!   and for actually running the job returned by [`AdmissionQueue::admit`]
//!   or [`AdmissionQueue::complete`]
//!
//! # Capacity
//!
//! `max_queue` counts waiting jobs only. The active slot is separate, so at
//! most `max_queue + 1` admitted jobs are outstanding at any time.

mod types;

use std::collections::VecDeque;
use std::time::Instant;

use nrtts_core::{CancelledJob, CompletedResult};

pub use types::{Admission, QueueSnapshot, QueuedJob};

/// Active slot, pending FIFO and the append-only result logs.
pub struct AdmissionQueue {
    active: Option<QueuedJob>,
    pending: VecDeque<QueuedJob>,
    results: Vec<CompletedResult>,
    cancelled: Vec<CancelledJob>,
    max_queue: usize,
    stopped: bool,
}

impl AdmissionQueue {
    pub const fn new(max_queue: usize) -> Self {
        Self {
            active: None,
            pending: VecDeque::new(),
            results: Vec::new(),
            cancelled: Vec::new(),
            max_queue,
            stopped: false,
        }
    }

    pub const fn max_queue(&self) -> usize {
        self.max_queue
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub const fn active(&self) -> Option<&QueuedJob> {
        self.active.as_ref()
    }

    pub const fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// No active job and nothing waiting.
    pub fn is_idle(&self) -> bool {
        self.active.is_none() && self.pending.is_empty()
    }

    pub fn results(&self) -> &[CompletedResult] {
        &self.results
    }

    pub fn cancelled(&self) -> &[CancelledJob] {
        &self.cancelled
    }

    /// Decide what happens to `job`.
    ///
    /// On [`Admission::Start`] the job is already installed in the active slot
    /// and the caller must execute it.
    pub fn admit(&mut self, job: QueuedJob) -> Admission {
        if self.stopped {
            return Admission::Stopped;
        }
        if self.active.is_none() {
            self.active = Some(job.clone());
            return Admission::Start(job);
        }
        if self.pending.len() < self.max_queue {
            self.pending.push_back(job);
            return Admission::Queued {
                depth: self.pending.len(),
            };
        }
        Admission::Full
    }

    /// Record the active job's result, then promote the queue head.
    ///
    /// Success and failure are treated alike. Returns the promoted job, which
    /// is now active and must be executed by the caller, or `None` if the
    /// queue went idle (or is stopped).
    pub fn complete(&mut self, result: CompletedResult) -> Option<QueuedJob> {
        debug_assert_eq!(
            self.active.as_ref().map(|job| job.request_id),
            Some(result.request_id),
            "completed result must belong to the active job"
        );
        self.results.push(result);
        self.active = None;

        if self.stopped {
            return None;
        }
        let next = self.pending.pop_front()?;
        self.active = Some(next.clone());
        Some(next)
    }

    /// Suppress further promotion and move every waiting job to the
    /// cancelled log. The active job is left alone.
    ///
    /// Returns how many jobs were cancelled by this call.
    pub fn stop(&mut self) -> usize {
        self.stopped = true;
        let now = Instant::now();
        let drained = self.pending.len();
        self.cancelled
            .extend(self.pending.drain(..).map(|job| job.cancel(now)));
        drained
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        QueueSnapshot {
            active: self.active.as_ref().map(|job| job.request_id),
            pending: self.pending.iter().map(|job| job.request_id).collect(),
            completed: self.results.len(),
            cancelled: self.cancelled.len(),
            max_queue: self.max_queue,
            stopped: self.stopped,
        }
    }
}
