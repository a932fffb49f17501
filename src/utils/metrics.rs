use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use log::{trace, warn};
use crate::types::SkipReason;

/// Row counters for the lenient table readers.
#[derive(Debug)]
pub struct ParseMetrics {
    rows_seen: AtomicU64,
    rows_parsed: AtomicU64,
    rows_skipped: AtomicU64,
    start_time: Instant,
}

impl ParseMetrics {
    pub fn new() -> Self {
        Self {
            rows_seen: AtomicU64::new(0),
            rows_parsed: AtomicU64::new(0),
            rows_skipped: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_parsed(&self) {
        self.rows_seen.fetch_add(1, Ordering::Relaxed);
        self.rows_parsed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_skipped(&self, line: u64, reason: SkipReason) {
        self.rows_seen.fetch_add(1, Ordering::Relaxed);
        self.rows_skipped.fetch_add(1, Ordering::Relaxed);
        trace!("Skipped line {}: {}", line, reason);
    }

    pub fn get_stats(&self) -> ParseStats {
        ParseStats {
            rows_seen: self.rows_seen.load(Ordering::Relaxed),
            rows_parsed: self.rows_parsed.load(Ordering::Relaxed),
            rows_skipped: self.rows_skipped.load(Ordering::Relaxed),
            elapsed_ms: self.start_time.elapsed().as_millis() as u64,
        }
    }

    /// Warn once with the skip total if anything was dropped.
    pub fn report(&self, what: &str) -> ParseStats {
        let stats = self.get_stats();
        if stats.rows_skipped > 0 {
            warn!(
                "{}: skipped {} of {} rows with too few fields",
                what, stats.rows_skipped, stats.rows_seen
            );
        }
        stats
    }
}

impl Default for ParseMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseStats {
    pub rows_seen: u64,
    pub rows_parsed: u64,
    pub rows_skipped: u64,
    pub elapsed_ms: u64,
}

impl ParseStats {
    pub fn skip_rate(&self) -> f64 {
        if self.rows_seen == 0 {
            return 0.0;
        }
        self.rows_skipped as f64 / self.rows_seen as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_parsed_and_skipped_rows() {
        let metrics = ParseMetrics::new();
        metrics.record_parsed();
        metrics.record_parsed();
        metrics.record_parsed();
        metrics.record_skipped(4, SkipReason::TooFewFields { expected: 5, found: 2 });

        let stats = metrics.get_stats();
        assert_eq!(stats.rows_seen, 4);
        assert_eq!(stats.rows_parsed, 3);
        assert_eq!(stats.rows_skipped, 1);
        assert!((stats.skip_rate() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_metrics_have_zero_skip_rate() {
        assert_eq!(ParseMetrics::default().get_stats().skip_rate(), 0.0);
    }
}
