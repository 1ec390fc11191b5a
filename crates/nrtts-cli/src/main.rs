//! CLI entry point - the composition root.
//!
//! Adapters are wired in `bootstrap`; handlers only see `CliContext`.

use std::process::ExitCode;
use std::time::Duration;

use clap::{CommandFactory, Parser};
use nrtts_core::DEFAULT_SYNTHESIS_TIMEOUT;
use tracing_subscriber::EnvFilter;

use nrtts_cli::error::exit_code_for;
use nrtts_cli::handlers::{self, multi::MultiArgs};
use nrtts_cli::{Cli, CliConfig, Commands, bootstrap};

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command.clone() else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut config = CliConfig::from_cli(&cli)?;
    if let Commands::Ping { timeout_ms } = &command {
        config = config.with_probe_timeout(Duration::from_millis(*timeout_ms));
    }
    let ctx = bootstrap(config);

    match command {
        Commands::Ping { .. } => {
            handlers::ping::execute(&ctx).await?;
        }
        Commands::Say { text, play } => {
            handlers::say::execute(&ctx, &text, play).await?;
        }
        Commands::Multi {
            texts,
            max_queue,
            interval_ms,
            wait_timeout_secs,
        } => {
            let args = MultiArgs {
                texts,
                max_queue,
                interval: Duration::from_millis(interval_ms),
                wait_timeout: Duration::from_secs(wait_timeout_secs),
                stop_grace: DEFAULT_SYNTHESIS_TIMEOUT,
            };
            handlers::multi::execute(&ctx, &args).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables before parsing so env-backed flags see them
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(exit_code_for(&err))
        }
    }
}
