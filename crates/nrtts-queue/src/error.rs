//! Errors raised while constructing a controller.
//!
//! Admission itself never fails: rejections are [`nrtts_core::DecisionKind`]
//! values, not errors.

use nrtts_core::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    /// The runner task needs an ambient Tokio runtime.
    #[error("Admission controller must be created inside a Tokio runtime")]
    NoRuntime,

    #[error("Invalid queue configuration: {0}")]
    Config(#[from] ConfigError),
}
