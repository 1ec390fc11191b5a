//! Behavioural tests for `AdmissionController` against scripted backends.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mockall::mock;
use nrtts_core::{
    DecisionKind, QueueConfig, SubmissionDecision, SynthesisOutcome, SynthesisPort, SynthesisReason,
    SynthesisRequest,
};
use nrtts_queue::{AdmissionController, QueueError};
use tokio::sync::Semaphore;

const SETTLE: Option<Duration> = Some(Duration::from_secs(5));

// ── Scripted backends ────────────────────────────────────────────────────────

/// Holds every call until the test releases a permit.
///
/// Texts starting with `fail` produce a `RUNTIME_ERROR` outcome. Tracks the
/// number of concurrent calls to check the single-active invariant.
struct GatedBackend {
    gate: Semaphore,
    calls: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl GatedBackend {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            gate: Semaphore::new(0),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        })
    }

    fn release(&self, n: usize) {
        self.gate.add_permits(n);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SynthesisPort for GatedBackend {
    async fn synthesize(&self, request: &SynthesisRequest) -> SynthesisOutcome {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.calls.lock().unwrap().push(request.text.clone());

        self.gate.acquire().await.unwrap().forget();

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if request.text.starts_with("fail") {
            SynthesisOutcome::failed(request, SynthesisReason::RuntimeError, "scripted failure")
        } else {
            let path = PathBuf::from(format!("/tmp/{}.wav", request.text));
            SynthesisOutcome::succeeded(request, path, 3)
        }
    }
}

struct PanickingBackend;

#[async_trait]
impl SynthesisPort for PanickingBackend {
    async fn synthesize(&self, request: &SynthesisRequest) -> SynthesisOutcome {
        if request.text == "boom" {
            panic!("backend exploded");
        }
        SynthesisOutcome::succeeded(request, PathBuf::from("/tmp/ok.wav"), 1)
    }
}

mock! {
    Backend {}

    #[async_trait]
    impl SynthesisPort for Backend {
        async fn synthesize(&self, request: &SynthesisRequest) -> SynthesisOutcome;
    }
}

fn controller(max_queue: i64, backend: Arc<dyn SynthesisPort>) -> AdmissionController {
    AdmissionController::with_capacity(max_queue, backend).unwrap()
}

// ── Admission decisions ─────────────────────────────────────────────────────

#[tokio::test]
async fn capacity_one_starts_queues_then_rejects() {
    let backend = GatedBackend::new();
    let ctl = controller(1, backend.clone());

    let a = ctl.submit("a");
    let b = ctl.submit("b");
    let c = ctl.submit("c");

    assert_eq!(a.decision, DecisionKind::ActiveStarted);
    assert_eq!(b.decision, DecisionKind::Queued);
    assert_eq!(c.decision, DecisionKind::RejectedQueueFull);
    assert_eq!(ctl.pending_queue_length(), 1);
    assert_eq!(ctl.active_request(), Some(a.request_id));

    backend.release(2);
    assert!(ctl.wait_all(SETTLE).await);

    let texts: Vec<_> = ctl.results().into_iter().map(|r| r.text).collect();
    assert_eq!(texts, ["a", "b"]);
}

#[tokio::test]
async fn zero_capacity_allows_only_the_active_slot() {
    let backend = GatedBackend::new();
    let ctl = controller(0, backend.clone());

    assert_eq!(ctl.submit("a").decision, DecisionKind::ActiveStarted);
    assert_eq!(ctl.submit("b").decision, DecisionKind::RejectedQueueFull);
    assert_eq!(ctl.max_queue(), 0);

    backend.release(1);
    assert!(ctl.wait_all(SETTLE).await);
    assert_eq!(ctl.results().len(), 1);
}

#[tokio::test]
async fn blank_text_is_rejected_without_state_change() {
    let backend = GatedBackend::new();
    let ctl = controller(2, backend.clone());

    let idle_reject = ctl.submit("");
    assert_eq!(idle_reject.decision, DecisionKind::RejectedEmpty);
    assert_eq!(ctl.active_request(), None);

    ctl.submit("a");
    ctl.submit("b");
    let before = ctl.snapshot();

    let busy_reject = ctl.submit("   ");
    assert_eq!(busy_reject.decision, DecisionKind::RejectedEmpty);
    assert_eq!(busy_reject.text, "   ");
    assert_eq!(ctl.snapshot(), before);

    backend.release(2);
    assert!(ctl.wait_all(SETTLE).await);
    assert_eq!(backend.calls(), ["a", "b"]);
}

#[tokio::test]
async fn admitted_text_is_trimmed() {
    let backend = GatedBackend::new();
    let ctl = controller(1, backend.clone());

    let decision = ctl.submit("  hello there \n");
    assert_eq!(decision.text, "hello there");

    backend.release(1);
    assert!(ctl.wait_all(SETTLE).await);
    assert_eq!(backend.calls(), ["hello there"]);
}

#[tokio::test]
async fn request_ids_are_unique_including_rejections() {
    let backend = GatedBackend::new();
    let ctl = controller(1, backend.clone());

    let ids: Vec<_> = ["a", "b", "c", "", "d", "  "]
        .iter()
        .map(|t| ctl.submit(t).request_id)
        .collect();
    let distinct: HashSet<_> = ids.iter().collect();
    assert_eq!(distinct.len(), ids.len());

    backend.release(2);
    assert!(ctl.wait_all(SETTLE).await);
}

// ── Execution & promotion ───────────────────────────────────────────────────

#[tokio::test]
async fn results_follow_admission_order_with_one_job_in_flight() {
    let backend = GatedBackend::new();
    let ctl = controller(3, backend.clone());

    let admitted: Vec<_> = ["one", "two", "three", "four", "five"]
        .iter()
        .map(|t| ctl.submit(t))
        .filter(|d| d.decision.is_admitted())
        .map(|d| d.request_id)
        .collect();
    assert_eq!(admitted.len(), 4);

    backend.release(4);
    assert!(ctl.wait_all(SETTLE).await);

    let completed: Vec<_> = ctl.results().iter().map(|r| r.request_id).collect();
    assert_eq!(completed, admitted);
    assert_eq!(backend.max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(ctl.pending_queue_length(), 0);
    assert_eq!(ctl.active_request(), None);
}

#[tokio::test]
async fn failures_do_not_halt_the_pipeline() {
    let backend = GatedBackend::new();
    let ctl = controller(3, backend.clone());

    ctl.submit("fail-1");
    ctl.submit("ok-2");
    ctl.submit("fail-3");

    backend.release(3);
    assert!(ctl.wait_all(SETTLE).await);

    let results = ctl.results();
    let summary: Vec<_> = results.iter().map(|r| (r.success, r.reason)).collect();
    assert_eq!(
        summary,
        [
            (false, SynthesisReason::RuntimeError),
            (true, SynthesisReason::Ok),
            (false, SynthesisReason::RuntimeError),
        ]
    );
    assert_eq!(results[0].error.as_deref(), Some("scripted failure"));
    assert_eq!(
        results[1].audio_path.as_deref(),
        Some(std::path::Path::new("/tmp/ok-2.wav"))
    );
}

#[tokio::test]
async fn backend_outcome_is_passed_through_verbatim() {
    let mut backend = MockBackend::new();
    backend
        .expect_synthesize()
        .times(2)
        .returning(|request| {
            SynthesisOutcome::failed(request, SynthesisReason::Canceled, "HTTP 503: busy")
                .with_latency(Some(42))
        });
    let ctl = controller(1, Arc::new(backend));

    ctl.submit("x");
    ctl.submit("y");
    assert!(ctl.wait_all(SETTLE).await);

    for result in ctl.results() {
        assert!(!result.success);
        assert_eq!(result.reason, SynthesisReason::Canceled);
        assert_eq!(result.latency_ms, Some(42));
        assert_eq!(result.error.as_deref(), Some("HTTP 503: busy"));
        assert!(result.completed_at >= result.started_at);
    }
}

#[tokio::test]
async fn requests_carry_configured_target() {
    let mut backend = MockBackend::new();
    backend
        .expect_synthesize()
        .withf(|request| {
            request.host == "http://tts.internal:5001"
                && request.voice == "en-GB-SoniaNeural"
                && request.timeout == Duration::from_secs(3)
        })
        .times(1)
        .returning(|request| SynthesisOutcome::succeeded(request, PathBuf::from("a.wav"), 1));

    let config = QueueConfig::new("http://tts.internal:5001/", "en-GB-SoniaNeural", 2)
        .unwrap()
        .with_synthesis_timeout(Duration::from_secs(3));
    let ctl = AdmissionController::new(config, Arc::new(backend)).unwrap();

    ctl.submit("hello");
    assert!(ctl.wait_all(SETTLE).await);
    assert!(ctl.results()[0].success);
}

#[tokio::test]
async fn panicking_backend_is_recorded_as_runtime_error() {
    let ctl = controller(2, Arc::new(PanickingBackend));

    ctl.submit("boom");
    ctl.submit("after");
    assert!(ctl.wait_all(SETTLE).await);

    let results = ctl.results();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].reason, SynthesisReason::RuntimeError);
    assert!(results[0].error.as_deref().unwrap().contains("backend exploded"));
    assert!(results[1].success);
}

#[tokio::test]
async fn slot_reopens_after_drain() {
    let backend = GatedBackend::new();
    let ctl = controller(1, backend.clone());

    ctl.submit("first");
    backend.release(1);
    assert!(ctl.wait_all(SETTLE).await);

    assert_eq!(ctl.submit("second").decision, DecisionKind::ActiveStarted);
    backend.release(1);
    assert!(ctl.wait_all(SETTLE).await);
    assert_eq!(ctl.results().len(), 2);
}

// ── wait_all & stop ─────────────────────────────────────────────────────────

#[tokio::test]
async fn wait_all_times_out_while_busy() {
    let backend = GatedBackend::new();
    let ctl = controller(1, backend.clone());
    ctl.submit("slow");

    assert!(!ctl.wait_all(Some(Duration::from_millis(120))).await);

    backend.release(1);
    assert!(ctl.wait_all(None).await);
}

#[tokio::test]
async fn wait_all_on_idle_controller_returns_immediately() {
    let ctl = controller(3, GatedBackend::new());
    assert!(ctl.wait_all(Some(Duration::ZERO)).await);
}

#[tokio::test]
async fn stop_cancels_waiting_jobs_but_finishes_the_active_one() {
    let backend = GatedBackend::new();
    let ctl = controller(3, backend.clone());

    let a = ctl.submit("a");
    let b = ctl.submit("b");
    let c = ctl.submit("c");

    ctl.stop();
    assert!(ctl.is_stopped());
    assert_eq!(ctl.pending_queue_length(), 0);

    let cancelled: Vec<_> = ctl.cancelled().iter().map(|j| j.request_id).collect();
    assert_eq!(cancelled, [b.request_id, c.request_id]);

    assert_eq!(ctl.submit("d").decision, DecisionKind::RejectedStopped);

    backend.release(1);
    assert!(ctl.wait_all(SETTLE).await);

    let results = ctl.results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].request_id, a.request_id);
    assert_eq!(backend.calls(), ["a"]);
}

// ── Concurrency ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn concurrent_submissions_respect_capacity() {
    const THREADS: usize = 16;
    let backend = GatedBackend::new();
    let ctl = controller(4, backend.clone());
    let barrier = Barrier::new(THREADS);

    let decisions: Vec<SubmissionDecision> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..THREADS)
            .map(|i| {
                let ctl = &ctl;
                let barrier = &barrier;
                scope.spawn(move || {
                    barrier.wait();
                    ctl.submit(&format!("job-{i}"))
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let count = |kind: DecisionKind| decisions.iter().filter(|d| d.decision == kind).count();
    assert_eq!(count(DecisionKind::ActiveStarted), 1);
    assert_eq!(count(DecisionKind::Queued), 4);
    assert_eq!(count(DecisionKind::RejectedQueueFull), THREADS - 5);

    backend.release(5);
    assert!(ctl.wait_all(SETTLE).await);
    let results = ctl.results();
    assert_eq!(results.len(), 5);
    assert_eq!(backend.max_in_flight.load(Ordering::SeqCst), 1);

    // Results come back in admission order; decision timestamps must agree.
    let stamped: Vec<_> = results
        .iter()
        .map(|r| {
            decisions
                .iter()
                .find(|d| d.request_id == r.request_id)
                .unwrap()
                .timestamp
        })
        .collect();
    assert!(stamped.windows(2).all(|w| w[0] <= w[1]), "{stamped:?}");
}

// ── Construction ────────────────────────────────────────────────────────────

#[test]
fn construction_requires_a_runtime() {
    let err = AdmissionController::with_capacity(3, GatedBackend::new()).err();
    assert!(matches!(err, Some(QueueError::NoRuntime)));
}

#[tokio::test]
async fn negative_capacity_is_a_config_error() {
    let err = AdmissionController::with_capacity(-1, GatedBackend::new()).err();
    assert!(matches!(err, Some(QueueError::Config(_))));
}
