//! Settings domain types and validation.
//!
//! Defaults live here so every surface (CLI, tests, adapters) agrees on them.
//! Environment and flag layering happens in the binary.

use std::time::Duration;

/// Default base URL of the synthesis service.
pub const DEFAULT_HOST: &str = "http://localhost:5001";

/// Default neural voice.
pub const DEFAULT_VOICE: &str = "en-US-JennyNeural";

/// Default number of jobs allowed to wait behind the active one.
pub const DEFAULT_MAX_QUEUE: usize = 3;

/// Per-call synthesis timeout.
pub const DEFAULT_SYNTHESIS_TIMEOUT: Duration = Duration::from_secs(10);

/// Readiness probe timeout.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Directory for audio artifacts and evidence files, relative to the cwd.
pub const DEFAULT_OUTPUT_DIR: &str = "assets/output";

/// Environment variable names.
pub mod env {
    pub const HOST_URL: &str = "TTS_HOST_URL";
    pub const VOICE_NAME: &str = "VOICE_NAME";
    pub const MAX_QUEUE: &str = "TTS_MAX_QUEUE";
    pub const OUTPUT_DIR: &str = "TTS_OUTPUT_DIR";
    pub const SYNTH_OUTPUT_FILE: &str = "TTS_SYNTH_OUTPUT_FILE";
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("max_queue must be >= 0, got {0}")]
    NegativeCapacity(i64),

    #[error("Synthesis host must not be empty")]
    EmptyHost,

    #[error("Synthesis host must start with http:// or https://, got '{0}'")]
    InvalidHost(String),

    #[error("Voice name must not be empty")]
    EmptyVoice,
}

/// Where and with which voice to synthesize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechTarget {
    host: String,
    voice: String,
}

impl SpeechTarget {
    /// Validate and normalize a host/voice pair.
    ///
    /// Surrounding whitespace and trailing slashes on the host are stripped.
    pub fn new(host: impl AsRef<str>, voice: impl AsRef<str>) -> Result<Self, ConfigError> {
        let host = host.as_ref().trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(ConfigError::EmptyHost);
        }
        if !(host.starts_with("http://") || host.starts_with("https://")) {
            return Err(ConfigError::InvalidHost(host.to_owned()));
        }
        let voice = voice.as_ref().trim();
        if voice.is_empty() {
            return Err(ConfigError::EmptyVoice);
        }
        Ok(Self {
            host: host.to_owned(),
            voice: voice.to_owned(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn voice(&self) -> &str {
        &self.voice
    }
}

impl Default for SpeechTarget {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_owned(),
            voice: DEFAULT_VOICE.to_owned(),
        }
    }
}

/// Construction parameters for an admission controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    target: SpeechTarget,
    max_queue: usize,
    synthesis_timeout: Duration,
}

impl QueueConfig {
    /// Validate a raw configuration. `max_queue` counts waiting jobs only.
    pub fn new(
        host: impl AsRef<str>,
        voice: impl AsRef<str>,
        max_queue: i64,
    ) -> Result<Self, ConfigError> {
        Self::from_target(SpeechTarget::new(host, voice)?, max_queue)
    }

    pub fn from_target(target: SpeechTarget, max_queue: i64) -> Result<Self, ConfigError> {
        let max_queue =
            usize::try_from(max_queue).map_err(|_| ConfigError::NegativeCapacity(max_queue))?;
        Ok(Self {
            target,
            max_queue,
            synthesis_timeout: DEFAULT_SYNTHESIS_TIMEOUT,
        })
    }

    #[must_use]
    pub fn with_synthesis_timeout(mut self, timeout: Duration) -> Self {
        self.synthesis_timeout = timeout;
        self
    }

    pub const fn target(&self) -> &SpeechTarget {
        &self.target
    }

    pub const fn max_queue(&self) -> usize {
        self.max_queue
    }

    pub const fn synthesis_timeout(&self) -> Duration {
        self.synthesis_timeout
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            target: SpeechTarget::default(),
            max_queue: DEFAULT_MAX_QUEUE,
            synthesis_timeout: DEFAULT_SYNTHESIS_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = QueueConfig::default();
        assert_eq!(config.max_queue(), 3);
        assert_eq!(config.target().host(), "http://localhost:5001");
        assert_eq!(config.target().voice(), "en-US-JennyNeural");
        assert_eq!(config.synthesis_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_negative_capacity_rejected() {
        let err = QueueConfig::new(DEFAULT_HOST, DEFAULT_VOICE, -1).unwrap_err();
        assert_eq!(err, ConfigError::NegativeCapacity(-1));
    }

    #[test]
    fn test_zero_capacity_allowed() {
        let config = QueueConfig::new(DEFAULT_HOST, DEFAULT_VOICE, 0).unwrap();
        assert_eq!(config.max_queue(), 0);
    }

    #[test]
    fn test_host_normalization() {
        let target = SpeechTarget::new("  http://tts:5001//  ", " en-US-AriaNeural ").unwrap();
        assert_eq!(target.host(), "http://tts:5001");
        assert_eq!(target.voice(), "en-US-AriaNeural");
    }

    #[test]
    fn test_invalid_targets() {
        assert_eq!(SpeechTarget::new("   ", "v"), Err(ConfigError::EmptyHost));
        assert_eq!(
            SpeechTarget::new("localhost:5001", "v"),
            Err(ConfigError::InvalidHost("localhost:5001".into()))
        );
        assert_eq!(
            SpeechTarget::new(DEFAULT_HOST, ""),
            Err(ConfigError::EmptyVoice)
        );
    }
}
