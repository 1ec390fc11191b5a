//! `nrtts` command-line harness.
//!
//! Exercises the synthesis service and the admission queue from a shell and
//! leaves plain-text evidence files behind for later inspection.
#![deny(unused_crate_dependencies)]

// Used only by the binary target.
use dotenvy as _;
use tracing_subscriber as _;

#[cfg(test)]
use async_trait as _;
#[cfg(test)]
use tempfile as _;

pub mod bootstrap;
pub mod commands;
pub mod error;
pub mod evidence;
pub mod handlers;
pub mod parser;

pub use bootstrap::{CliConfig, CliContext, bootstrap};
pub use commands::Commands;
pub use error::CliError;
pub use evidence::EvidenceWriter;
pub use parser::Cli;
