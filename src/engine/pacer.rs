//! Fixed-rate frame pacing
//!
//! Each tick sleeps `max(0, target - elapsed)`. Overruns are counted and
//! logged, never caught up.

use std::time::Duration;

/// Overrun bookkeeping for a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacingStats {
    /// Ticks recorded
    pub ticks: u64,
    /// Ticks whose work took longer than the target interval
    pub overruns: u64,
    /// Largest amount a tick went over the target
    pub worst_overrun: Duration,
}

#[derive(Debug, Clone)]
pub struct Pacer {
    target: Duration,
    stats: PacingStats,
}

impl Pacer {
    pub fn new(target: Duration) -> Self {
        Self {
            target,
            stats: PacingStats::default(),
        }
    }

    /// Pacer for `frame_rate` ticks per second (0 is treated as 1)
    pub fn from_frame_rate(frame_rate: u32) -> Self {
        Self::new(Duration::from_secs(1) / frame_rate.max(1))
    }

    pub fn target(&self) -> Duration {
        self.target
    }

    pub fn stats(&self) -> PacingStats {
        self.stats
    }

    /// Time left in the tick budget after `elapsed` of work
    pub fn sleep_time(&self, elapsed: Duration) -> Duration {
        self.target.saturating_sub(elapsed)
    }

    /// Record one tick's work and return how long to sleep
    pub fn record(&mut self, elapsed: Duration) -> Duration {
        self.stats.ticks += 1;
        if elapsed > self.target {
            let over = elapsed - self.target;
            self.stats.overruns += 1;
            self.stats.worst_overrun = self.stats.worst_overrun.max(over);
            log::warn!(
                "Tick {} overran its {:?} budget by {:?}",
                self.stats.ticks,
                self.target,
                over
            );
        }
        self.sleep_time(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sleep_time_is_remaining_budget() {
        let pacer = Pacer::new(Duration::from_millis(16));
        assert_eq!(pacer.sleep_time(Duration::from_millis(6)), Duration::from_millis(10));
        assert_eq!(pacer.sleep_time(Duration::ZERO), Duration::from_millis(16));
    }

    #[test]
    fn test_sleep_time_never_negative() {
        let pacer = Pacer::new(Duration::from_millis(16));
        assert_eq!(pacer.sleep_time(Duration::from_millis(16)), Duration::ZERO);
        assert_eq!(pacer.sleep_time(Duration::from_millis(40)), Duration::ZERO);
    }

    #[test]
    fn test_record_counts_overruns() {
        let mut pacer = Pacer::new(Duration::from_millis(10));
        pacer.record(Duration::from_millis(4));
        pacer.record(Duration::from_millis(10));
        assert_eq!(pacer.record(Duration::from_millis(13)), Duration::ZERO);
        pacer.record(Duration::from_millis(25));

        let stats = pacer.stats();
        assert_eq!(stats.ticks, 4);
        assert_eq!(stats.overruns, 2);
        assert_eq!(stats.worst_overrun, Duration::from_millis(15));
    }

    #[test]
    fn test_from_frame_rate() {
        assert_eq!(Pacer::from_frame_rate(50).target(), Duration::from_millis(20));
        assert_eq!(Pacer::from_frame_rate(0).target(), Duration::from_secs(1));
    }
}
