//! Main CLI parser and top-level argument handling.
//!
//! Global options resolve as flag > environment (including `.env`) > default.

use std::path::PathBuf;

use clap::Parser;
use nrtts_core::settings::env;
use nrtts_core::{DEFAULT_HOST, DEFAULT_OUTPUT_DIR, DEFAULT_VOICE};

use crate::commands::Commands;

/// Command-line interface for the neural TTS harness.
#[derive(Parser, Debug)]
#[command(name = "nrtts")]
#[command(about = "Probe, smoke-test and load a neural text-to-speech service")]
#[command(version)]
pub struct Cli {
    /// Base URL of the synthesis service
    #[arg(long, global = true, env = env::HOST_URL, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Neural voice name
    #[arg(long, global = true, env = env::VOICE_NAME, default_value = DEFAULT_VOICE)]
    pub voice: String,

    /// Directory for audio artifacts and evidence files
    #[arg(long = "output-dir", global = true, env = env::OUTPUT_DIR, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Write every synthesized clip to this exact path instead
    #[arg(long = "output-file", global = true, env = env::SYNTH_OUTPUT_FILE)]
    pub output_file: Option<PathBuf>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
