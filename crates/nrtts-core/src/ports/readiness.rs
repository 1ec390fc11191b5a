//! Readiness probe port.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Longest message kept in a report.
pub const MAX_MESSAGE_CHARS: usize = 300;

/// Result of probing a synthesis service's readiness endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadinessReport {
    pub url: String,
    pub ok: bool,
    pub status_code: Option<u16>,
    pub elapsed: Duration,
    pub message: String,
    pub checked_at: DateTime<Utc>,
}

impl ReadinessReport {
    pub fn new(
        url: impl Into<String>,
        status_code: Option<u16>,
        elapsed: Duration,
        message: &str,
    ) -> Self {
        Self {
            url: url.into(),
            ok: status_code == Some(200),
            status_code,
            elapsed,
            message: message.chars().take(MAX_MESSAGE_CHARS).collect(),
            checked_at: Utc::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }

    pub const fn verdict(&self) -> &'static str {
        if self.ok { "PASS" } else { "FAIL" }
    }
}

/// Checks whether a synthesis service is ready to take requests.
#[async_trait]
pub trait ReadinessProbePort: Send + Sync {
    async fn probe(&self, host: &str) -> ReadinessReport;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_200_is_ready() {
        let ok = ReadinessReport::new("http://h/ready", Some(200), Duration::ZERO, "READY");
        assert!(ok.ok);
        assert_eq!(ok.verdict(), "PASS");

        let no_content = ReadinessReport::new("http://h/ready", Some(204), Duration::ZERO, "x");
        assert!(!no_content.ok);

        let unreachable = ReadinessReport::new("http://h/ready", None, Duration::ZERO, "Error: x");
        assert_eq!(unreachable.verdict(), "FAIL");
    }

    #[test]
    fn test_message_is_truncated() {
        let long = "e".repeat(1000);
        let report = ReadinessReport::new("u", None, Duration::from_millis(3), &long);
        assert_eq!(report.message.chars().count(), MAX_MESSAGE_CHARS);
        assert_eq!(report.elapsed_ms(), 3);
    }
}
