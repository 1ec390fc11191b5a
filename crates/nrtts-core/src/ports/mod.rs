//! Port definitions (trait abstractions) for external systems.
//!
//! Every port here is infallible at the type level: adapters report failure
//! through reason codes inside the returned outcome record.

mod playback;
mod readiness;
mod synthesis;

pub use playback::{PlaybackOutcome, PlaybackPort};
pub use readiness::{ReadinessProbePort, ReadinessReport};
pub use synthesis::{SynthesisOutcome, SynthesisPort, SynthesisRequest};
