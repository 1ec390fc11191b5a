//! CLI-specific error types and mappings.
//!
//! Service failures (probe, synthesis, playback) are not errors here: they
//! are reported in output and evidence and the process still exits 0.

use nrtts_core::ConfigError;
use nrtts_queue::QueueError;
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid host, voice or queue capacity.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Evidence files could not be written.
    #[error("IO error: {0}")]
    Io(String),

    /// Runtime wiring failed (task join, missing runtime).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow sysexits.h where one fits.
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) => 78,   // EX_CONFIG
            Self::Io(_) => 74,       // EX_IOERR
            Self::Internal(_) => 70, // EX_SOFTWARE
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<QueueError> for CliError {
    fn from(err: QueueError) -> Self {
        match err {
            QueueError::Config(config) => Self::Config(config.to_string()),
            QueueError::NoRuntime => Self::Internal(QueueError::NoRuntime.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

/// Exit code for an error bubbling out of a handler.
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<CliError>().map_or(1, CliError::exit_code)
}
