//! CLI bootstrap - the composition root.
//!
//! This module is the ONLY place where concrete adapters are instantiated:
//! - HTTP synthesizer and readiness probe (via nrtts-speech)
//! - WAV playback sink (via nrtts-speech)
//! - Evidence writer
//!
//! Command handlers receive the composed [`CliContext`] and only see ports.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use nrtts_core::{
    DEFAULT_PROBE_TIMEOUT, PlaybackPort, ReadinessProbePort, SpeechTarget, SynthesisPort,
};
use nrtts_speech::{HttpReadinessProbe, HttpSynthesizer, SynthesizerConfig, WavPlayback};

use crate::error::CliError;
use crate::evidence::EvidenceWriter;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    pub target: SpeechTarget,
    /// Directory for audio artifacts and evidence files.
    pub output_dir: PathBuf,
    /// Fixed audio path overriding the timestamped one.
    pub output_file: Option<PathBuf>,
    pub probe_timeout: Duration,
}

impl CliConfig {
    /// Validate global options.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        Ok(Self {
            target: SpeechTarget::new(&cli.host, &cli.voice)?,
            output_dir: cli.output_dir.clone(),
            output_file: cli.output_file.clone(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        })
    }

    #[must_use]
    pub const fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }
}

/// Fully composed context for CLI commands.
pub struct CliContext {
    pub config: CliConfig,
    pub synthesizer: Arc<dyn SynthesisPort>,
    pub probe: Arc<dyn ReadinessProbePort>,
    pub playback: Arc<dyn PlaybackPort>,
    pub evidence: EvidenceWriter,
}

impl CliContext {
    /// Compose a context from explicit ports.
    pub fn new(
        config: CliConfig,
        synthesizer: Arc<dyn SynthesisPort>,
        probe: Arc<dyn ReadinessProbePort>,
        playback: Arc<dyn PlaybackPort>,
    ) -> Self {
        let evidence = EvidenceWriter::new(config.output_dir.clone());
        Self {
            config,
            synthesizer,
            probe,
            playback,
            evidence,
        }
    }
}

/// Wire the production adapters.
pub fn bootstrap(config: CliConfig) -> CliContext {
    let synthesizer = HttpSynthesizer::new(SynthesizerConfig {
        output_dir: config.output_dir.clone(),
        output_file: config.output_file.clone(),
        ..SynthesizerConfig::default()
    });
    let probe = HttpReadinessProbe::new(config.probe_timeout);

    tracing::debug!(
        host = config.target.host(),
        voice = config.target.voice(),
        output_dir = %config.output_dir.display(),
        "CLI context bootstrapped"
    );
    CliContext::new(
        config,
        Arc::new(synthesizer),
        Arc::new(probe),
        Arc::new(WavPlayback),
    )
}
