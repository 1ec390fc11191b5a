//! Evidence files.
//!
//! Each command leaves one plain-text file in the output directory:
//! `key=value` lines for `ping` and `say`, `|`-separated records for `multi`.
//! Missing values render as empty strings.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::Instant;

use nrtts_core::{
    CancelledJob, CompletedResult, PlaybackOutcome, ReadinessReport, RequestId, SubmissionDecision,
    SynthesisOutcome,
};

use crate::error::CliError;

pub const READINESS_FILE: &str = "readiness.txt";
pub const SMOKE_FILE: &str = "synthesis-smoke.txt";
pub const QUEUE_FILE: &str = "queue.txt";

/// Writes evidence files into one directory, creating it on demand.
#[derive(Debug, Clone)]
pub struct EvidenceWriter {
    dir: PathBuf,
}

impl EvidenceWriter {
    pub const fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Replace `name` with `lines`, newline-terminated.
    pub fn write(&self, name: &str, lines: &[String]) -> Result<PathBuf, CliError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(name);
        let mut contents = lines.join("\n");
        contents.push('\n');
        std::fs::write(&path, contents)?;
        tracing::debug!(path = %path.display(), lines = lines.len(), "Wrote evidence file");
        Ok(path)
    }
}

/// An active job that outlived the stop grace period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbandonedJob {
    pub request_id: RequestId,
    pub text: String,
    pub abandoned_at: Instant,
}

/// Everything `multi` observed, with instants relative to `origin`.
#[derive(Debug, Clone)]
pub struct QueueRun {
    pub origin: Instant,
    pub max_queue: usize,
    pub decisions: Vec<SubmissionDecision>,
    pub results: Vec<CompletedResult>,
    pub cancelled: Vec<CancelledJob>,
    pub abandoned: Option<AbandonedJob>,
    /// Whether the queue drained before the wait timeout.
    pub drained: bool,
}

impl QueueRun {
    fn offset_ms(&self, at: Instant) -> u128 {
        at.saturating_duration_since(self.origin).as_millis()
    }
}

fn opt<T: Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn one_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

pub fn readiness_lines(report: &ReadinessReport) -> Vec<String> {
    vec![
        format!("timestamp={}", report.checked_at.to_rfc3339()),
        format!("url={}", report.url),
        format!("status_code={}", opt(report.status_code)),
        format!("elapsed_ms={}", report.elapsed_ms()),
        format!("result={}", report.verdict()),
        format!("message={}", one_line(&report.message)),
    ]
}

pub fn smoke_lines(outcome: &SynthesisOutcome, playback: Option<&PlaybackOutcome>) -> Vec<String> {
    let mut lines = vec![
        format!("timestamp={}", chrono::Utc::now().to_rfc3339()),
        format!("text={}", one_line(&outcome.text)),
        format!("voice={}", outcome.voice),
        format!("latency_ms={}", opt(outcome.latency_ms)),
        format!("success={}", outcome.success),
        format!("reason={}", outcome.reason),
        format!("error={}", opt(outcome.error.as_deref().map(one_line))),
        format!("host={}", outcome.host),
        format!(
            "audio_path={}",
            opt(outcome.audio_path.as_deref().map(Path::display))
        ),
    ];
    if let Some(playback) = playback {
        lines.extend([
            format!("playback_played={}", playback.played),
            format!("playback_success={}", playback.success),
            format!("playback_reason={}", playback.reason),
            format!("playback_player={}", opt(playback.used_player.as_deref())),
            format!("playback_start_offset_ms={}", opt(playback.start_offset_ms)),
            format!(
                "playback_duration_s={}",
                opt(playback.duration_seconds.map(|d| format!("{d:.3}")))
            ),
            format!("playback_error={}", opt(playback.error.as_deref().map(one_line))),
        ]);
    }
    lines
}

/// `decision|…`, then `result|…`, `cancelled|…` and `abandoned|…` records.
pub fn queue_lines(run: &QueueRun) -> Vec<String> {
    let max_queue = run.max_queue;
    let decisions = run.decisions.iter().map(|d| {
        format!(
            "decision|{}|{}|{}|{}|max_queue={max_queue}",
            d.request_id,
            d.decision,
            run.offset_ms(d.timestamp),
            one_line(&d.text),
        )
    });
    let results = run.results.iter().map(|r| {
        format!(
            "result|{}|{}|{}|{}|{}|{}|{}|max_queue={max_queue}",
            r.request_id,
            r.success,
            r.reason,
            opt(r.latency_ms),
            run.offset_ms(r.started_at),
            run.offset_ms(r.completed_at),
            one_line(&r.text),
        )
    });
    let cancelled = run.cancelled.iter().map(|c| {
        format!(
            "cancelled|{}|{}|{}|max_queue={max_queue}",
            c.request_id,
            run.offset_ms(c.cancelled_at),
            one_line(&c.text),
        )
    });
    let abandoned = run.abandoned.iter().map(|a| {
        format!(
            "abandoned|{}|{}|{}|max_queue={max_queue}",
            a.request_id,
            run.offset_ms(a.abandoned_at),
            one_line(&a.text),
        )
    });
    decisions
        .chain(results)
        .chain(cancelled)
        .chain(abandoned)
        .collect()
}
