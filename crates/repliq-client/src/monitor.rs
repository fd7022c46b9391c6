//! Dispatch-pool saturation monitoring.
//!
//! The client counts in-flight calls and reports here on every dispatch.
//! When the pool is saturated a warning is logged, at most once per report
//! interval. The clock is passed in explicitly so tests drive the monitor
//! without real timers. The monitor only observes; it never rejects work.

use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::warn;

/// Point-in-time view of the dispatch pool.
#[derive(Debug, Clone, Copy)]
pub struct PoolStats {
    pub in_flight: usize,
    pub capacity: usize,
}

impl PoolStats {
    pub fn is_saturated(&self) -> bool {
        self.capacity > 0 && self.in_flight >= self.capacity
    }
}

/// Rate-limited saturation reporter.
pub struct SaturationMonitor {
    min_report_interval: Duration,
    last_report: Mutex<Option<Instant>>,
}

impl SaturationMonitor {
    pub fn new(min_report_interval: Duration) -> Self {
        Self {
            min_report_interval,
            last_report: Mutex::new(None),
        }
    }

    /// Checks the given stats at the given instant.
    ///
    /// Returns whether a saturation warning was emitted; repeated
    /// observations within the report interval are deduplicated.
    pub fn observe(&self, now: Instant, stats: PoolStats) -> bool {
        if !stats.is_saturated() {
            return false;
        }

        {
            let mut last_report = self.last_report.lock().expect("monitor state poisoned");
            if let Some(previous) = *last_report {
                if now.saturating_duration_since(previous) < self.min_report_interval {
                    return false;
                }
            }
            *last_report = Some(now);
        }

        warn!(
            in_flight = stats.in_flight,
            capacity = stats.capacity,
            "dispatch pool saturated; calls may wait before their first attempt"
        );
        true
    }
}

impl Default for SaturationMonitor {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsaturated_pool_is_silent() {
        let monitor = SaturationMonitor::default();
        let stats = PoolStats { in_flight: 3, capacity: 16 };
        assert!(!monitor.observe(Instant::now(), stats));
    }

    #[test]
    fn test_saturation_is_reported_once_per_interval() {
        let monitor = SaturationMonitor::new(Duration::from_secs(1));
        let stats = PoolStats { in_flight: 16, capacity: 16 };
        let start = Instant::now();

        assert!(monitor.observe(start, stats));
        // Within the interval: deduplicated.
        assert!(!monitor.observe(start + Duration::from_millis(500), stats));
        // Past the interval: reported again.
        assert!(monitor.observe(start + Duration::from_millis(1500), stats));
    }

    #[test]
    fn test_zero_capacity_never_reports() {
        let monitor = SaturationMonitor::default();
        let stats = PoolStats { in_flight: 100, capacity: 0 };
        assert!(!monitor.observe(Instant::now(), stats));
    }
}
