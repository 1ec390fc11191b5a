//! `nrtts multi`: push several utterances through the admission queue.

use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use nrtts_core::{DecisionKind, QueueConfig, RequestId, SubmissionDecision};
use nrtts_queue::AdmissionController;
use tracing::warn;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::evidence::{AbandonedJob, QUEUE_FILE, QueueRun, queue_lines};

/// Parameters of one `multi` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiArgs {
    pub texts: Vec<String>,
    pub max_queue: i64,
    pub interval: Duration,
    pub wait_timeout: Duration,
    /// How long to let the active job finish after a wait timeout.
    pub stop_grace: Duration,
}

/// Decision tallies printed at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultiSummary {
    pub active_started: usize,
    pub queued: usize,
    /// `REJECTED_QUEUE_FULL` only.
    pub rejected: usize,
    pub rejected_empty: usize,
    pub rejected_stopped: usize,
    pub results: usize,
    pub max_queue: usize,
}

impl MultiSummary {
    pub fn from_run(run: &QueueRun) -> Self {
        let count = |kind: DecisionKind| run.decisions.iter().filter(|d| d.decision == kind).count();
        Self {
            active_started: count(DecisionKind::ActiveStarted),
            queued: count(DecisionKind::Queued),
            rejected: count(DecisionKind::RejectedQueueFull),
            rejected_empty: count(DecisionKind::RejectedEmpty),
            rejected_stopped: count(DecisionKind::RejectedStopped),
            results: run.results.len(),
            max_queue: run.max_queue,
        }
    }
}

/// Submit every text, wait for the queue to drain, and collect what happened.
///
/// If the wait times out the controller is stopped: still-waiting jobs show
/// up as cancelled and the active job gets `stop_grace` to finish. A job
/// still running after that is reported as abandoned.
pub async fn run(ctx: &CliContext, args: &MultiArgs) -> Result<QueueRun, CliError> {
    let config = QueueConfig::from_target(ctx.config.target.clone(), args.max_queue)?;
    let controller = AdmissionController::new(config, Arc::clone(&ctx.synthesizer))?;

    let origin = Instant::now();
    let mut decisions = Vec::with_capacity(args.texts.len());
    for (i, text) in args.texts.iter().enumerate() {
        decisions.push(controller.submit(text));
        if i + 1 < args.texts.len() && !args.interval.is_zero() {
            tokio::time::sleep(args.interval).await;
        }
    }

    let drained = controller.wait_all(Some(args.wait_timeout)).await;
    let mut abandoned = None;
    if !drained {
        warn!(
            timeout_secs = args.wait_timeout.as_secs(),
            pending = controller.pending_queue_length(),
            "Queue did not drain in time, stopping"
        );
        controller.stop();
        if !controller.wait_all(Some(args.stop_grace)).await {
            abandoned = controller
                .active_request()
                .map(|id| abandon(id, &decisions));
        }
    }

    Ok(QueueRun {
        origin,
        max_queue: controller.max_queue(),
        decisions,
        results: controller.results(),
        cancelled: controller.cancelled(),
        abandoned,
        drained,
    })
}

fn abandon(request_id: RequestId, decisions: &[SubmissionDecision]) -> AbandonedJob {
    let text = decisions
        .iter()
        .find(|d| d.request_id == request_id)
        .map(|d| d.text.clone())
        .unwrap_or_default();
    warn!(id = %request_id, "Active job still running after the grace period, abandoning");
    AbandonedJob {
        request_id,
        text,
        abandoned_at: Instant::now(),
    }
}

pub async fn execute(ctx: &CliContext, args: &MultiArgs) -> Result<MultiSummary> {
    let run = run(ctx, args).await?;
    let path = ctx.evidence.write(QUEUE_FILE, &queue_lines(&run))?;
    let summary = MultiSummary::from_run(&run);

    for decision in &run.decisions {
        println!("{} {} {:?}", decision.decision, decision.request_id, decision.text);
    }
    for result in &run.results {
        println!(
            "RESULT {} success={} reason={} latency_ms={} elapsed_ms={}",
            result.request_id,
            result.success,
            result.reason,
            result
                .latency_ms
                .map_or_else(|| "-".to_owned(), |ms| ms.to_string()),
            result.elapsed().as_millis()
        );
    }
    if !run.drained {
        println!(
            "Timed out after {}s; {} job(s) cancelled",
            args.wait_timeout.as_secs(),
            run.cancelled.len()
        );
    }
    if let Some(job) = &run.abandoned {
        println!("ABANDONED {} {:?}", job.request_id, job.text);
    }
    println!(
        "MULTI complete | active_started={} queued={} rejected={} results={} max_queue={} \
         | rejected_empty={} rejected_stopped={}",
        summary.active_started,
        summary.queued,
        summary.rejected,
        summary.results,
        summary.max_queue,
        summary.rejected_empty,
        summary.rejected_stopped
    );
    println!("Evidence: {}", path.display());
    Ok(summary)
}
