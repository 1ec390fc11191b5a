//! Speech adapters for nrtts.
//!
//! Implementations of the `nrtts-core` ports:
//!
//! - [`HttpSynthesizer`]: [`nrtts_core::SynthesisPort`] over the neural TTS
//!   container REST surface (SSML in, streamed RIFF/PCM out)
//! - [`HttpReadinessProbe`]: [`nrtts_core::ReadinessProbePort`] via `GET /ready`
//! - [`WavPlayback`]: [`nrtts_core::PlaybackPort`] for WAV artifacts, with real
//!   audio output behind the `playback` feature

mod error;
mod playback;
mod readiness;
mod ssml;
mod synthesizer;

pub use error::SpeechError;
pub use playback::{PLAYER_NAME, WavPlayback, wav_duration};
pub use readiness::{HttpReadinessProbe, READY_PATH};
pub use ssml::render_ssml;
pub use synthesizer::{
    DEFAULT_OUTPUT_FORMAT, HttpSynthesizer, SYNTHESIS_PATH, SynthesizerConfig,
};
