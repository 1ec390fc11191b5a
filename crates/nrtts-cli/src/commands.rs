//! Subcommand definitions.

use clap::Subcommand;
use nrtts_core::settings::env;

// `DEFAULT_MAX_QUEUE` as a clap literal.
const DEFAULT_MAX_QUEUE_ARG: &str = "3";

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Check the service's readiness endpoint and record the verdict
    Ping {
        /// Probe timeout in milliseconds
        #[arg(long = "timeout-ms", default_value_t = 2000)]
        timeout_ms: u64,
    },

    /// Synthesize one utterance and record latency
    Say {
        /// Text to speak
        text: String,

        /// Play the result on the local output device
        #[arg(long)]
        play: bool,
    },

    /// Push several utterances through the admission queue
    Multi {
        /// Texts, submitted in order
        #[arg(required = true, num_args = 1..)]
        texts: Vec<String>,

        /// Jobs allowed to wait behind the active one
        #[arg(
            long = "max-queue",
            env = env::MAX_QUEUE,
            default_value = DEFAULT_MAX_QUEUE_ARG,
            allow_negative_numbers = true
        )]
        max_queue: i64,

        /// Delay between submissions in milliseconds
        #[arg(long = "interval-ms", default_value_t = 50)]
        interval_ms: u64,

        /// Give up waiting for the queue to drain after this many seconds
        #[arg(long = "wait-timeout-secs", default_value_t = 30)]
        wait_timeout_secs: u64,
    },
}
