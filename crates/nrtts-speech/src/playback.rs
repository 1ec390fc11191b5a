//! WAV playback sink.
//!
//! Duration is always read from the WAV header. Actual audio output needs
//! the `playback` feature; without it every attempt is reported as
//! `PLAYER_MISSING`, which callers treat as a graceful skip.

use std::path::Path;
use std::time::Instant;

use nrtts_core::{PlaybackOutcome, PlaybackPort};

/// Name reported in `used_player`.
pub const PLAYER_NAME: &str = "rodio";

/// [`PlaybackPort`] for WAV files on the default output device.
#[derive(Debug, Clone, Copy, Default)]
pub struct WavPlayback;

impl PlaybackPort for WavPlayback {
    fn play(&self, path: &Path, reference: Option<Instant>) -> PlaybackOutcome {
        if !path.is_file() {
            return PlaybackOutcome::missing_file(path);
        }
        let duration = wav_duration(path);
        output::play(path, reference, duration)
    }
}

/// Length of a WAV file in seconds (frames / sample rate).
///
/// `None` if the file is not a readable WAV or declares a zero sample rate.
pub fn wav_duration(path: &Path) -> Option<f64> {
    let reader = hound::WavReader::open(path).ok()?;
    let rate = reader.spec().sample_rate;
    if rate == 0 {
        return None;
    }
    Some(f64::from(reader.duration()) / f64::from(rate))
}

#[cfg(feature = "playback")]
mod output {
    use std::fs::File;
    use std::io::BufReader;
    use std::path::Path;
    use std::time::Instant;

    use nrtts_core::PlaybackOutcome;
    use rodio::{Decoder, OutputStream, Sink};
    use tracing::{debug, warn};

    use super::PLAYER_NAME;

    pub(super) fn play(
        path: &Path,
        reference: Option<Instant>,
        duration: Option<f64>,
    ) -> PlaybackOutcome {
        // The stream must outlive the sink.
        let (_stream, handle) = match OutputStream::try_default() {
            Ok(pair) => pair,
            Err(e) => {
                debug!(error = %e, "No audio output device");
                return PlaybackOutcome::player_missing(path, duration);
            }
        };
        let fail = |e: String| {
            warn!(path = %path.display(), error = %e, "Playback failed");
            PlaybackOutcome::play_error(path, PLAYER_NAME, e, duration)
        };

        let sink = match Sink::try_new(&handle) {
            Ok(sink) => sink,
            Err(e) => return fail(e.to_string()),
        };
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => return fail(e.to_string()),
        };
        let source = match Decoder::new(BufReader::new(file)) {
            Ok(source) => source,
            Err(e) => return fail(e.to_string()),
        };

        let started_at = Instant::now();
        sink.append(source);
        sink.sleep_until_end();
        debug!(path = %path.display(), ?duration, "Playback finished");
        PlaybackOutcome::played(path, PLAYER_NAME, started_at, reference, duration)
    }
}

#[cfg(not(feature = "playback"))]
mod output {
    use std::path::Path;
    use std::time::Instant;

    use nrtts_core::PlaybackOutcome;
    use tracing::debug;

    pub(super) fn play(
        path: &Path,
        _reference: Option<Instant>,
        duration: Option<f64>,
    ) -> PlaybackOutcome {
        debug!(path = %path.display(), "Built without audio output, skipping playback");
        PlaybackOutcome::player_missing(path, duration)
    }
}
