//! `nrtts say`: single synthesis smoke test.

use std::sync::Arc;

use anyhow::Result;
use nrtts_core::{PlaybackOutcome, SynthesisOutcome, SynthesisRequest};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::evidence::{SMOKE_FILE, smoke_lines};

/// What `say` produced.
#[derive(Debug, Clone)]
pub struct SayReport {
    pub synthesis: SynthesisOutcome,
    pub playback: Option<PlaybackOutcome>,
}

/// Synthesize `text`, optionally play it, and record the outcome.
///
/// Playback is only attempted when synthesis succeeded.
pub async fn execute(ctx: &CliContext, text: &str, play: bool) -> Result<SayReport> {
    let request = SynthesisRequest::new(text, &ctx.config.target);
    let synthesis = ctx.synthesizer.synthesize(&request).await;

    let playback = match (&synthesis.audio_path, play && synthesis.success) {
        (Some(path), true) => {
            let sink = Arc::clone(&ctx.playback);
            let path = path.clone();
            let reference = synthesis.started_at;
            let outcome = tokio::task::spawn_blocking(move || sink.play(&path, reference))
                .await
                .map_err(|e| CliError::Internal(format!("playback task failed: {e}")))?;
            Some(outcome)
        }
        _ => None,
    };

    let path = ctx
        .evidence
        .write(SMOKE_FILE, &smoke_lines(&synthesis, playback.as_ref()))?;

    let verdict = if synthesis.success { "PASS" } else { "FAIL" };
    let mut line = format!(
        "SAY {verdict} | latency_ms={} | voice={} | reason={}",
        synthesis
            .latency_ms
            .map_or_else(|| "-".to_owned(), |ms| ms.to_string()),
        synthesis.voice,
        synthesis.reason
    );
    if let Some(playback) = &playback {
        line.push_str(&format!(" | playback={}", playback.reason));
    }
    println!("{line}");
    if let Some(error) = &synthesis.error {
        println!("Error: {error}");
    }
    println!("Evidence: {}", path.display());

    Ok(SayReport {
        synthesis,
        playback,
    })
}
