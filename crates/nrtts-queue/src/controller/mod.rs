//! Admission controller.
//!
//! The controller wraps an [`AdmissionQueue`] in a mutex and owns one runner
//! task. `submit()` holds the lock only for the state transition; the runner
//! calls the synthesis backend with the lock released and re-acquires it to
//! record the result and promote the next job.

mod worker;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use nrtts_core::{
    CancelledJob, CompletedResult, DecisionKind, QueueConfig, RequestId, SpeechTarget,
    SubmissionDecision, SynthesisPort, SynthesisReason, SynthesisRequest,
};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender, error::SendError};
use tracing::{debug, info, warn};

use crate::error::QueueError;
use crate::queue::{Admission, AdmissionQueue, QueueSnapshot, QueuedJob};

/// How often [`AdmissionController::wait_all`] re-checks for idleness.
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// State shared between the controller handle and its runner task.
struct Shared {
    state: Mutex<AdmissionQueue>,
    synthesizer: Arc<dyn SynthesisPort>,
    target: SpeechTarget,
    synthesis_timeout: Duration,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, AdmissionQueue> {
        // The state machine never panics mid-transition, so a poisoned lock
        // still guards consistent state.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn request_for(&self, job: &QueuedJob) -> SynthesisRequest {
        SynthesisRequest::new(job.text.clone(), &self.target).with_timeout(self.synthesis_timeout)
    }

    /// Record `result` and return the promoted job, if any.
    fn finalize(&self, result: CompletedResult) -> Option<QueuedJob> {
        let id = result.request_id;
        let success = result.success;
        let reason = result.reason;
        let mut state = self.lock();
        let next = state.complete(result);
        let pending = state.pending_len();
        drop(state);

        debug!(%id, success, %reason, pending, "Synthesis job finished");
        if let Some(next) = &next {
            debug!(id = %next.request_id, pending, "Promoted queued job");
        }
        next
    }
}

/// One active synthesis job plus a bounded FIFO, with immediate rejection
/// once the FIFO is full.
///
/// Must be created inside a Tokio runtime. Dropping the controller stops it:
/// waiting jobs are cancelled and the runner exits after the active job.
pub struct AdmissionController {
    shared: Arc<Shared>,
    jobs: UnboundedSender<QueuedJob>,
}

impl AdmissionController {
    /// Create a controller and spawn its runner on the current runtime.
    pub fn new(
        config: QueueConfig,
        synthesizer: Arc<dyn SynthesisPort>,
    ) -> Result<Self, QueueError> {
        let runtime = Handle::try_current().map_err(|_| QueueError::NoRuntime)?;

        let shared = Arc::new(Shared {
            state: Mutex::new(AdmissionQueue::new(config.max_queue())),
            synthesizer,
            target: config.target().clone(),
            synthesis_timeout: config.synthesis_timeout(),
        });
        let (jobs, rx) = mpsc::unbounded_channel();
        runtime.spawn(run_loop(Arc::clone(&shared), rx));

        info!(
            max_queue = config.max_queue(),
            host = config.target().host(),
            voice = config.target().voice(),
            "Admission controller started"
        );
        Ok(Self { shared, jobs })
    }

    /// Create a controller for the default host and voice.
    pub fn with_capacity(
        max_queue: i64,
        synthesizer: Arc<dyn SynthesisPort>,
    ) -> Result<Self, QueueError> {
        let config = QueueConfig::from_target(SpeechTarget::default(), max_queue)?;
        Self::new(config, synthesizer)
    }

    /// Decide whether `text` runs now, waits, or is rejected.
    ///
    /// Never blocks on synthesis. Blank text is rejected without touching
    /// the queue and keeps its original form in the returned decision.
    pub fn submit(&self, text: &str) -> SubmissionDecision {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            let decision =
                SubmissionDecision::new(RequestId::new(), text, DecisionKind::RejectedEmpty);
            debug!(id = %decision.request_id, decision = %decision.decision, "Rejected submission");
            return decision;
        }

        let job = QueuedJob::new(trimmed);
        let request_id = job.request_id;
        // Stamped under the lock: timestamp order is admission order.
        let (admission, decision) = {
            let mut state = self.shared.lock();
            let admission = state.admit(job);
            let decision = SubmissionDecision::new(request_id, trimmed, admission.decision());
            if let Admission::Start(job) = &admission {
                self.dispatch(&mut state, job.clone());
            }
            (admission, decision)
        };

        match admission {
            Admission::Start(_) => {
                info!(id = %request_id, decision = %decision.decision, "Started synthesis job");
            }
            Admission::Queued { depth } => {
                info!(id = %request_id, depth, decision = %decision.decision, "Queued synthesis job");
            }
            Admission::Full | Admission::Stopped => {
                warn!(id = %request_id, decision = %decision.decision, "Rejected submission");
            }
        }
        decision
    }

    /// Hand a freshly installed active job to the runner.
    ///
    /// If the runner is gone the job is recorded as failed so the active slot
    /// cannot stay occupied forever.
    fn dispatch(&self, state: &mut AdmissionQueue, job: QueuedJob) {
        let mut job = job;
        loop {
            match self.jobs.send(job) {
                Ok(()) => return,
                Err(SendError(lost)) => {
                    warn!(id = %lost.request_id, "Runner unavailable, failing job");
                    let now = Instant::now();
                    let result = CompletedResult {
                        request_id: lost.request_id,
                        text: lost.text,
                        success: false,
                        latency_ms: None,
                        audio_path: None,
                        reason: SynthesisReason::RuntimeError,
                        error: Some("synthesis runner is not running".to_owned()),
                        started_at: now,
                        completed_at: now,
                    };
                    match state.complete(result) {
                        Some(next) => job = next,
                        None => return,
                    }
                }
            }
        }
    }

    /// Wait until nothing is active or queued.
    ///
    /// Polls every [`POLL_INTERVAL`]. Returns `false` if `timeout` elapsed
    /// first; `None` waits indefinitely.
    pub async fn wait_all(&self, timeout: Option<Duration>) -> bool {
        let deadline = timeout.and_then(|t| tokio::time::Instant::now().checked_add(t));
        loop {
            let idle = self.shared.lock().is_idle();
            if idle {
                return true;
            }
            if deadline.is_some_and(|d| tokio::time::Instant::now() >= d) {
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    /// Stop promoting queued jobs.
    ///
    /// Waiting jobs move to [`Self::cancelled`]; the active job runs to
    /// completion and its result is still recorded. Later submissions are
    /// rejected with [`DecisionKind::RejectedStopped`].
    pub fn stop(&self) {
        let cancelled = self.shared.lock().stop();
        info!(cancelled, "Admission controller stopped");
    }

    /// Completed results in completion (= admission) order.
    pub fn results(&self) -> Vec<CompletedResult> {
        self.shared.lock().results().to_vec()
    }

    /// Jobs stranded by [`Self::stop`].
    pub fn cancelled(&self) -> Vec<CancelledJob> {
        self.shared.lock().cancelled().to_vec()
    }

    pub fn pending_queue_length(&self) -> usize {
        self.shared.lock().pending_len()
    }

    pub fn max_queue(&self) -> usize {
        self.shared.lock().max_queue()
    }

    pub fn active_request(&self) -> Option<RequestId> {
        self.shared.lock().active().map(|job| job.request_id)
    }

    pub fn is_stopped(&self) -> bool {
        self.shared.lock().is_stopped()
    }

    pub fn snapshot(&self) -> QueueSnapshot {
        self.shared.lock().snapshot()
    }
}

impl Drop for AdmissionController {
    fn drop(&mut self) {
        self.shared.lock().stop();
    }
}

/// Runner loop.
///
/// Runs for the lifetime of the controller, waiting on the channel while idle
/// and executing the promotion chain itself once a job arrives.
async fn run_loop(shared: Arc<Shared>, mut jobs: UnboundedReceiver<QueuedJob>) {
    debug!("Synthesis runner started");
    while let Some(job) = jobs.recv().await {
        let mut next = Some(job);
        while let Some(job) = next.take() {
            let request = shared.request_for(&job);
            let result = worker::run_job(&job, shared.synthesizer.as_ref(), &request).await;
            next = shared.finalize(result);
        }
    }
    debug!("Synthesis runner exiting");
}
