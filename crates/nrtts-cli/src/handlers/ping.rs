//! `nrtts ping`: readiness check.

use anyhow::Result;
use nrtts_core::ReadinessReport;

use crate::bootstrap::CliContext;
use crate::evidence::{READINESS_FILE, readiness_lines};

/// Probe the configured host and record the verdict.
pub async fn execute(ctx: &CliContext) -> Result<ReadinessReport> {
    let report = ctx.probe.probe(ctx.config.target.host()).await;
    let path = ctx
        .evidence
        .write(READINESS_FILE, &readiness_lines(&report))?;

    println!(
        "Ping {} | status={} | elapsed_ms={} | {}",
        report.verdict(),
        report
            .status_code
            .map_or_else(|| "-".to_owned(), |s| s.to_string()),
        report.elapsed_ms(),
        report.message
    );
    println!("Evidence: {}", path.display());
    Ok(report)
}
