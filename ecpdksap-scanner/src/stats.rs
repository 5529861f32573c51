//! Scan statistics and progress reporting.

use serde::{Deserialize, Serialize};

use ecpdksap_core::constants::expected_false_positive_rate;

/// Statistics for scanning operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Total candidates evaluated
    pub total_scanned: u64,
    /// Candidates rejected by the view tag filter
    pub filtered_out: u64,
    /// Candidates whose published tag matched
    pub view_tag_matches: u64,
    /// Candidates that went through full recovery
    pub discoveries: u64,
    /// Candidates that failed to decode
    pub errors: u64,
    /// Wall-clock duration of the scan in milliseconds
    pub duration_ms: u64,
    /// Time spent decoding and filtering, summed over candidates
    pub filter_ms: f64,
    /// Time spent in full recovery, summed over candidates
    pub recovery_ms: f64,
}

impl ScanStats {
    /// Creates a new stats tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the scan rate (candidates per second).
    pub fn rate(&self) -> f64 {
        if self.duration_ms == 0 {
            0.0
        } else {
            (self.total_scanned as f64 / self.duration_ms as f64) * 1000.0
        }
    }

    /// Returns the filter efficiency (percentage of candidates rejected by tag).
    pub fn filter_efficiency(&self) -> f64 {
        if self.total_scanned == 0 {
            0.0
        } else {
            (self.filtered_out as f64 / self.total_scanned as f64) * 100.0
        }
    }

    /// Average filtering cost per candidate, in milliseconds.
    pub fn avg_filter_ms(&self) -> f64 {
        if self.total_scanned == 0 {
            0.0
        } else {
            self.filter_ms / self.total_scanned as f64
        }
    }

    /// Average recovery cost per recovered candidate, in milliseconds.
    pub fn avg_recovery_ms(&self) -> f64 {
        if self.discoveries == 0 {
            0.0
        } else {
            self.recovery_ms / self.discoveries as f64
        }
    }

    /// Expected number of non-matching candidates surviving an `n`-byte filter.
    pub fn expected_false_positives(&self, num_bytes: usize) -> f64 {
        self.total_scanned as f64 * expected_false_positive_rate(num_bytes)
    }
}

/// Scan progress information.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanProgress {
    /// Total candidates to scan
    pub total: u64,
    /// Candidates scanned so far
    pub scanned: u64,
    /// Recoveries so far
    pub discoveries: u64,
    /// Current scan rate (candidates per second)
    pub rate: f64,
    /// Estimated time remaining in seconds
    pub eta_seconds: Option<f64>,
    /// Percentage complete (0-100)
    pub percent: f64,
}

impl ScanProgress {
    /// Creates a new progress tracker.
    pub fn new(total: u64) -> Self {
        Self {
            total,
            scanned: 0,
            discoveries: 0,
            rate: 0.0,
            eta_seconds: None,
            percent: 0.0,
        }
    }

    /// Updates progress with new values.
    pub fn update(&mut self, scanned: u64, discoveries: u64, elapsed_ms: u64) {
        self.scanned = scanned;
        self.discoveries = discoveries;

        if elapsed_ms > 0 {
            self.rate = (scanned as f64 / elapsed_ms as f64) * 1000.0;
        }

        if self.total > 0 {
            self.percent = (scanned as f64 / self.total as f64) * 100.0;

            if self.rate > 0.0 {
                let remaining = self.total.saturating_sub(scanned);
                self.eta_seconds = Some(remaining as f64 / self.rate);
            }
        }
    }
}

/// Scan result summary.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScanSummary {
    /// Number of candidates scanned
    pub total_scanned: u64,
    /// Number of view tag matches
    pub view_tag_matches: u64,
    /// Number of recoveries
    pub discoveries: u64,
    /// Number of errors
    pub errors: u64,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Scan rate (candidates per second)
    pub rate: f64,
    /// Filter efficiency (% rejected by view tag)
    pub filter_efficiency: f64,
    /// Average filter phase cost per candidate (ms)
    pub avg_filter_ms: f64,
    /// Average recovery phase cost per recovery (ms)
    pub avg_recovery_ms: f64,
}

impl From<&ScanStats> for ScanSummary {
    fn from(stats: &ScanStats) -> Self {
        Self {
            total_scanned: stats.total_scanned,
            view_tag_matches: stats.view_tag_matches,
            discoveries: stats.discoveries,
            errors: stats.errors,
            duration_ms: stats.duration_ms,
            rate: stats.rate(),
            filter_efficiency: stats.filter_efficiency(),
            avg_filter_ms: stats.avg_filter_ms(),
            avg_recovery_ms: stats.avg_recovery_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_progress_eta() {
        let mut progress = ScanProgress::new(1000);

        // Simulate 500 scanned in 1000ms (500/s rate)
        progress.update(500, 2, 1000);

        assert!((progress.percent - 50.0).abs() < 0.1);
        assert!((progress.rate - 500.0).abs() < 1.0);

        // ETA should be ~1 second for remaining 500
        assert!(progress.eta_seconds.is_some());
        assert!((progress.eta_seconds.unwrap() - 1.0).abs() < 0.1);
    }

    #[test]
    fn test_stats_ratios() {
        let stats = ScanStats {
            total_scanned: 200,
            filtered_out: 150,
            view_tag_matches: 50,
            discoveries: 50,
            duration_ms: 100,
            filter_ms: 20.0,
            recovery_ms: 100.0,
            ..ScanStats::default()
        };
        assert!((stats.filter_efficiency() - 75.0).abs() < 1e-9);
        assert!((stats.rate() - 2000.0).abs() < 1e-9);
        assert!((stats.avg_filter_ms() - 0.1).abs() < 1e-9);
        assert!((stats.avg_recovery_ms() - 2.0).abs() < 1e-9);
        assert!((stats.expected_false_positives(1) - 200.0 / 256.0).abs() < 1e-9);

        let summary = ScanSummary::from(&stats);
        assert_eq!(summary.discoveries, 50);
    }

    #[test]
    fn test_empty_stats() {
        let stats = ScanStats::new();
        assert_eq!(stats.rate(), 0.0);
        assert_eq!(stats.filter_efficiency(), 0.0);
        assert_eq!(stats.avg_recovery_ms(), 0.0);
    }
}
