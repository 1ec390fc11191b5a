//! Readiness probe for the synthesis service.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use nrtts_core::{DEFAULT_PROBE_TIMEOUT, ReadinessProbePort, ReadinessReport};
use reqwest::Client;
use tracing::debug;

/// Readiness endpoint, relative to the host.
pub const READY_PATH: &str = "/ready";

/// Single `GET {host}/ready` with a short timeout. Only 200 counts as ready.
#[derive(Debug, Clone)]
pub struct HttpReadinessProbe {
    timeout: Duration,
}

impl HttpReadinessProbe {
    pub const fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for HttpReadinessProbe {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT)
    }
}

#[async_trait]
impl ReadinessProbePort for HttpReadinessProbe {
    async fn probe(&self, host: &str) -> ReadinessReport {
        let url = format!("{}{READY_PATH}", host.trim_end_matches('/'));
        let started = Instant::now();

        let client = match Client::builder().timeout(self.timeout).build() {
            Ok(client) => client,
            Err(e) => {
                return ReadinessReport::new(url, None, started.elapsed(), &format!("Error: {e}"));
            }
        };

        let report = match client.get(&url).send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                let message = if status == 200 {
                    "READY".to_owned()
                } else {
                    format!("Unexpected status {status}")
                };
                ReadinessReport::new(url, Some(status), started.elapsed(), &message)
            }
            Err(e) => ReadinessReport::new(url, None, started.elapsed(), &format!("Error: {e}")),
        };

        debug!(
            url = %report.url,
            status = ?report.status_code,
            elapsed_ms = report.elapsed_ms(),
            ok = report.ok,
            "Readiness probe finished"
        );
        report
    }
}
