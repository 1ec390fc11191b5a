//! HTTP synthesis backend.
//!
//! Speaks the REST surface of a neural TTS container: SSML is POSTed and
//! the RIFF/PCM response body is streamed straight to a `.wav` file.
//! Latency is measured from the start of the call to the first body chunk.

use std::path::{Path, PathBuf};
use std::time::Instant;

use async_trait::async_trait;
use futures_util::StreamExt;
use nrtts_core::{
    DEFAULT_OUTPUT_DIR, SynthesisOutcome, SynthesisPort, SynthesisReason, SynthesisRequest,
};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Url};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::error::SpeechError;
use crate::ssml::render_ssml;

/// Synthesis endpoint, relative to the host.
pub const SYNTHESIS_PATH: &str = "/speech/synthesize/cognitiveservices/v1";

/// PCM 16-bit, 16 kHz, mono, RIFF container.
pub const DEFAULT_OUTPUT_FORMAT: &str = "riff-16khz-16bit-mono-pcm";

const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";
const ERROR_BODY_LIMIT: usize = 200;

/// Where synthesized audio is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesizerConfig {
    /// Directory for timestamped artifacts.
    pub output_dir: PathBuf,
    /// Fixed artifact path; overrides `output_dir` when set.
    pub output_file: Option<PathBuf>,
    /// Value of the output-format header.
    pub output_format: String,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            output_file: None,
            output_format: DEFAULT_OUTPUT_FORMAT.to_owned(),
        }
    }
}

/// [`SynthesisPort`] over HTTP.
#[derive(Debug, Clone, Default)]
pub struct HttpSynthesizer {
    config: SynthesizerConfig,
}

/// Audio that made it to disk.
struct Delivery {
    path: PathBuf,
    first_audio_at: Instant,
    bytes: usize,
}

impl HttpSynthesizer {
    pub const fn new(config: SynthesizerConfig) -> Self {
        Self { config }
    }

    /// Path for the next artifact.
    ///
    /// Timestamped names carry millisecond precision so back-to-back queue
    /// jobs do not overwrite each other.
    pub fn next_audio_path(&self) -> PathBuf {
        self.config.output_file.clone().unwrap_or_else(|| {
            let stamp = chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
            self.config.output_dir.join(format!("tts_{stamp}.wav"))
        })
    }

    async fn deliver(&self, request: &SynthesisRequest) -> Result<Delivery, SpeechError> {
        let url = Url::parse(&format!("{}{SYNTHESIS_PATH}", request.host))
            .map_err(|e| SpeechError::Client(format!("invalid host '{}': {e}", request.host)))?;
        let client = Client::builder()
            .timeout(request.timeout)
            .build()
            .map_err(|e| SpeechError::Client(e.to_string()))?;

        debug!(%url, voice = %request.voice, chars = request.text.len(), "Sending synthesis request");
        let response = client
            .post(url)
            .header(CONTENT_TYPE, "application/ssml+xml")
            .header(OUTPUT_FORMAT_HEADER, &self.config.output_format)
            .header(USER_AGENT, concat!("nrtts/", env!("CARGO_PKG_VERSION")))
            .body(render_ssml(&request.voice, &request.text))
            .send()
            .await
            .map_err(|e| SpeechError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        let path = self.next_audio_path();
        let mut sink: Option<(File, Instant)> = None;
        let mut bytes = 0usize;
        let streamed = stream_body(response, &path, &mut sink, &mut bytes).await;

        if let Err(err) = streamed {
            if sink.take().is_some() {
                discard_partial(&path).await;
            }
            return Err(err);
        }
        let (mut file, first_audio_at) = sink.ok_or(SpeechError::EmptyAudio)?;
        if let Err(e) = file.flush().await {
            drop(file);
            discard_partial(&path).await;
            return Err(SpeechError::io(&path, &e));
        }
        Ok(Delivery {
            path,
            first_audio_at,
            bytes,
        })
    }
}

/// Copy the response body into `path`, creating the file at the first
/// non-empty chunk.
async fn stream_body(
    response: reqwest::Response,
    path: &Path,
    sink: &mut Option<(File, Instant)>,
    bytes: &mut usize,
) -> Result<(), SpeechError> {
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| SpeechError::Stream(e.to_string()))?;
        if chunk.is_empty() {
            continue;
        }
        if sink.is_none() {
            let first_audio_at = Instant::now();
            *sink = Some((create_artifact(path).await?, first_audio_at));
        }
        if let Some((file, _)) = sink.as_mut() {
            file.write_all(&chunk)
                .await
                .map_err(|e| SpeechError::io(path, &e))?;
        }
        *bytes += chunk.len();
    }
    Ok(())
}

/// Remove a truncated artifact.
async fn discard_partial(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!(path = %path.display(), error = %e, "Could not remove partial audio file");
    } else {
        debug!(path = %path.display(), "Removed partial audio file");
    }
}

async fn create_artifact(path: &Path) -> Result<File, SpeechError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| SpeechError::io(path, &e))?;
    }
    File::create(path).await.map_err(|e| SpeechError::io(path, &e))
}

fn millis_between(start: Instant, end: Instant) -> u64 {
    u64::try_from(end.saturating_duration_since(start).as_millis()).unwrap_or(u64::MAX)
}

#[async_trait]
impl SynthesisPort for HttpSynthesizer {
    async fn synthesize(&self, request: &SynthesisRequest) -> SynthesisOutcome {
        if request.text.trim().is_empty() {
            return SynthesisOutcome::failed(request, SynthesisReason::Empty, "Text is empty");
        }

        let started_at = Instant::now();
        match self.deliver(request).await {
            Ok(delivery) => {
                let latency_ms = millis_between(started_at, delivery.first_audio_at);
                info!(
                    path = %delivery.path.display(),
                    latency_ms,
                    bytes = delivery.bytes,
                    voice = %request.voice,
                    "Synthesis complete"
                );
                SynthesisOutcome::succeeded(request, delivery.path, latency_ms)
                    .with_started_at(started_at)
                    .with_first_audio_at(delivery.first_audio_at)
            }
            Err(err) => {
                let reason = err.reason();
                let outcome = SynthesisOutcome::failed(request, reason, err.to_string())
                    .with_started_at(started_at);
                warn!(%reason, error = %err, host = %request.host, "Synthesis failed");
                if reason == SynthesisReason::BackendUnavailable {
                    outcome
                } else {
                    outcome.with_latency(Some(millis_between(started_at, Instant::now())))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_path_wins() {
        let synth = HttpSynthesizer::new(SynthesizerConfig {
            output_file: Some(PathBuf::from("/tmp/fixed.wav")),
            ..SynthesizerConfig::default()
        });
        assert_eq!(synth.next_audio_path(), PathBuf::from("/tmp/fixed.wav"));
    }

    #[test]
    fn test_timestamped_path_shape() {
        let synth = HttpSynthesizer::new(SynthesizerConfig {
            output_dir: PathBuf::from("out"),
            ..SynthesizerConfig::default()
        });
        let path = synth.next_audio_path();
        assert_eq!(path.parent(), Some(Path::new("out")));

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("tts_"));
        assert!(name.ends_with("Z.wav"));
        // tts_YYYYMMDDTHHMMSS.mmmZ.wav
        assert_eq!(name.len(), "tts_20260101T000000.000Z.wav".len());
    }

    #[tokio::test]
    async fn test_blank_text_never_hits_the_network() {
        let synth = HttpSynthesizer::default();
        let target = nrtts_core::SpeechTarget::new("http://127.0.0.1:9", "en-US-JennyNeural").unwrap();
        let outcome = synth
            .synthesize(&SynthesisRequest::new(" \t ", &target))
            .await;
        assert_eq!(outcome.reason, SynthesisReason::Empty);
        assert!(outcome.latency_ms.is_none());
        assert!(outcome.started_at.is_none());
    }
}
