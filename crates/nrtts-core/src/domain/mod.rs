//! Domain types for admission decisions and their outcomes.

mod decision;
mod reason;
mod request;
mod result;

pub use decision::{DecisionKind, SubmissionDecision};
pub use reason::{PlaybackReason, SynthesisReason};
pub use request::RequestId;
pub use result::{CancelledJob, CompletedResult};
