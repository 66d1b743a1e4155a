//! Structured logging setup and progress/ETA reporting for group loops.

use chrono::Utc;
use std::time::Instant;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Initialize tracing: JSON lines or plain text, level from RUST_LOG or default.
pub struct StructuredLogger;

impl StructuredLogger {
    pub fn init(json: bool, default_level: &str) {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        if json {
            let fmt = tracing_subscriber::fmt::layer()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_writer(std::io::stdout);
            tracing_subscriber::registry().with(filter).with(fmt).init();
        } else {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
                .init();
        }
    }
}

/// Estimates time remaining for a loop over a known number of items.
pub struct ProgressTimer {
    started: Instant,
    total: usize,
    done: usize,
}

impl ProgressTimer {
    pub fn new(total: usize) -> Self {
        Self {
            started: Instant::now(),
            total,
            done: 0,
        }
    }

    /// Mark `n` more items as processed.
    pub fn advance(&mut self, n: usize) {
        self.done += n;
    }

    pub fn done(&self) -> usize {
        self.done
    }

    fn remaining_secs(&self) -> Option<u64> {
        if self.done == 0 {
            return None;
        }
        let elapsed = self.started.elapsed().as_secs_f64();
        let per_item = elapsed / self.done as f64;
        let left = self.total.saturating_sub(self.done);
        Some((per_item * left as f64) as u64)
    }

    /// Remaining time as `HH:MM:SS`, or `"unknown"` before the first item.
    pub fn eta(&self) -> String {
        match self.remaining_secs() {
            Some(secs) => format!(
                "{:02}:{:02}:{:02}",
                secs / 3600,
                (secs % 3600) / 60,
                secs % 60
            ),
            None => "unknown".to_string(),
        }
    }

    /// Projected wall-clock completion time (RFC 3339), when estimable.
    pub fn completes_at(&self) -> Option<String> {
        let secs = self.remaining_secs()?;
        let dt = Utc::now() + chrono::Duration::seconds(secs as i64);
        Some(dt.to_rfc3339())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eta_unknown_before_progress() {
        let t = ProgressTimer::new(10);
        assert_eq!(t.eta(), "unknown");
        assert!(t.completes_at().is_none());
    }

    #[test]
    fn eta_formats_after_progress() {
        let mut t = ProgressTimer::new(4);
        t.advance(2);
        let eta = t.eta();
        assert_eq!(eta.len(), 8);
        assert_eq!(&eta[2..3], ":");
        assert!(t.completes_at().is_some());
    }
}
