//! Core domain types and port definitions for nrtts.
//!
//! This crate is free of I/O. It defines the admission decision vocabulary,
//! the outcome records produced by synthesis and playback, the settings
//! shared by every surface, and the port traits implemented by adapters in
//! `nrtts-speech`.
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod settings;

pub use domain::{
    CancelledJob, CompletedResult, DecisionKind, PlaybackReason, RequestId, SubmissionDecision,
    SynthesisReason,
};
pub use ports::{
    PlaybackOutcome, PlaybackPort, ReadinessProbePort, ReadinessReport, SynthesisOutcome,
    SynthesisPort, SynthesisRequest,
};
pub use settings::{
    ConfigError, DEFAULT_HOST, DEFAULT_MAX_QUEUE, DEFAULT_OUTPUT_DIR, DEFAULT_PROBE_TIMEOUT,
    DEFAULT_SYNTHESIS_TIMEOUT, DEFAULT_VOICE, QueueConfig, SpeechTarget,
};
