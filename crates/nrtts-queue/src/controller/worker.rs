//! Single-job execution.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::time::Instant;

use futures_util::FutureExt;
use nrtts_core::{CompletedResult, SynthesisOutcome, SynthesisPort, SynthesisReason, SynthesisRequest};
use tracing::error;

use crate::queue::QueuedJob;

/// Run one synthesis call and turn its outcome into a [`CompletedResult`].
///
/// Backend fields pass through untouched. A panicking backend is recorded as
/// [`SynthesisReason::RuntimeError`].
pub(super) async fn run_job(
    job: &QueuedJob,
    synthesizer: &dyn SynthesisPort,
    request: &SynthesisRequest,
) -> CompletedResult {
    let started_at = Instant::now();
    let outcome = match AssertUnwindSafe(synthesizer.synthesize(request))
        .catch_unwind()
        .await
    {
        Ok(outcome) => outcome,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(id = %job.request_id, %message, "Synthesis backend panicked");
            SynthesisOutcome::failed(
                request,
                SynthesisReason::RuntimeError,
                format!("synthesis backend panicked: {message}"),
            )
        }
    };
    let completed_at = Instant::now();

    CompletedResult {
        request_id: job.request_id,
        text: job.text.clone(),
        success: outcome.success,
        latency_ms: outcome.latency_ms,
        audio_path: outcome.audio_path,
        reason: outcome.reason,
        error: outcome.error,
        started_at,
        completed_at,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}
