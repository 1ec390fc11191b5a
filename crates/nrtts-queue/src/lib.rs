//! Admission-controlled text-to-speech queue.
//!
//! At most one synthesis job runs at a time. Up to `max_queue` further jobs
//! wait in a FIFO; anything beyond that is rejected immediately. The caller
//! always gets a decision synchronously and never waits on synthesis.
//!
//! # Architecture
//!
//! - [`queue`]: pure state machine (active slot, pending FIFO, result logs)
//! - [`AdmissionController`]: owns the state behind a mutex and drives a single
//!   persistent runner task that executes jobs and promotes the queue head

mod controller;
mod error;
pub mod queue;

pub use controller::{AdmissionController, POLL_INTERVAL};
pub use error::QueueError;
pub use queue::{Admission, AdmissionQueue, QueueSnapshot, QueuedJob};

