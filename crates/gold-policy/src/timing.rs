//! Rebase interval and window arithmetic.
//!
//! Time is cut into intervals of `min_rebase_time_interval_sec`. Inside each
//! interval a rebase is allowed during
//! `[offset, offset + length)` seconds past the interval start.

use serde::{Deserialize, Serialize};

use crate::{PolicyError, Result};

/// Interval and window parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RebaseTiming {
    min_rebase_time_interval_sec: u64,
    rebase_window_offset_sec: u64,
    rebase_window_length_sec: u64,
}

impl RebaseTiming {
    /// Validated timing parameters.
    ///
    /// # Errors
    ///
    /// - [`PolicyError::InvalidTimingParameters`] if the interval is zero or
    ///   the offset is not below it
    pub fn new(
        min_rebase_time_interval_sec: u64,
        rebase_window_offset_sec: u64,
        rebase_window_length_sec: u64,
    ) -> Result<Self> {
        if min_rebase_time_interval_sec == 0
            || rebase_window_offset_sec >= min_rebase_time_interval_sec
        {
            return Err(PolicyError::InvalidTimingParameters {
                interval: min_rebase_time_interval_sec,
                offset: rebase_window_offset_sec,
            });
        }
        Ok(Self {
            min_rebase_time_interval_sec,
            rebase_window_offset_sec,
            rebase_window_length_sec,
        })
    }

    pub fn min_rebase_time_interval_sec(&self) -> u64 {
        self.min_rebase_time_interval_sec
    }

    pub fn rebase_window_offset_sec(&self) -> u64 {
        self.rebase_window_offset_sec
    }

    pub fn rebase_window_length_sec(&self) -> u64 {
        self.rebase_window_length_sec
    }

    /// Whether `now` falls inside the rebase window of its interval.
    pub fn in_window(&self, now: u64) -> bool {
        let into_interval = now % self.min_rebase_time_interval_sec;
        into_interval >= self.rebase_window_offset_sec
            && into_interval
                < self
                    .rebase_window_offset_sec
                    .saturating_add(self.rebase_window_length_sec)
    }

    /// Start of the window in the interval containing `now`.
    ///
    /// Recorded as the last rebase time so the schedule does not drift with
    /// the moment a rebase happens to land.
    pub fn window_start(&self, now: u64) -> u64 {
        now - now % self.min_rebase_time_interval_sec + self.rebase_window_offset_sec
    }

    /// Check both time gates and return the aligned window start.
    ///
    /// # Errors
    ///
    /// - [`PolicyError::NotInWindow`] if `now` is outside the window
    /// - [`PolicyError::TooSoon`] if fewer than `min_rebase_time_interval_sec`
    ///   seconds have passed since `last_rebase_timestamp_sec`
    pub fn check(&self, now: u64, last_rebase_timestamp_sec: u64) -> Result<u64> {
        if !self.in_window(now) {
            return Err(PolicyError::NotInWindow { now });
        }
        let next_allowed =
            last_rebase_timestamp_sec.saturating_add(self.min_rebase_time_interval_sec);
        if now < next_allowed {
            return Err(PolicyError::TooSoon { now, next_allowed });
        }
        Ok(self.window_start(now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: u64 = 86_400;

    fn two_am_window() -> RebaseTiming {
        // 20 minutes starting 2 AM UTC, once a day.
        RebaseTiming::new(DAY, 7_200, 1_200).expect("timing")
    }

    #[test]
    fn test_rejects_zero_interval() {
        let err = RebaseTiming::new(0, 0, 10).expect_err("zero interval");
        assert!(matches!(err, PolicyError::InvalidTimingParameters { .. }));
    }

    #[test]
    fn test_rejects_offset_not_below_interval() {
        assert!(RebaseTiming::new(DAY, DAY, 10).is_err());
        assert!(RebaseTiming::new(DAY, DAY - 1, 10).is_ok());
    }

    #[test]
    fn test_window_bounds() {
        let timing = two_am_window();
        let midnight = 1_000 * DAY;
        assert!(!timing.in_window(midnight));
        assert!(!timing.in_window(midnight + 7_199));
        assert!(timing.in_window(midnight + 7_200));
        assert!(timing.in_window(midnight + 8_399));
        assert!(!timing.in_window(midnight + 8_400));
    }

    #[test]
    fn test_window_start_aligns() {
        let timing = two_am_window();
        let midnight = 1_000 * DAY;
        assert_eq!(timing.window_start(midnight + 7_500), midnight + 7_200);
    }

    #[test]
    fn test_check_gates() {
        let timing = two_am_window();
        let midnight = 1_000 * DAY;

        let last = timing.check(midnight + 7_300, 0).expect("first rebase");
        assert_eq!(last, midnight + 7_200);

        let err = timing
            .check(midnight + 7_400, last)
            .expect_err("same window");
        assert_eq!(
            err,
            PolicyError::TooSoon {
                now: midnight + 7_400,
                next_allowed: midnight + DAY + 7_200,
            }
        );

        let err = timing
            .check(midnight + DAY + 100, last)
            .expect_err("outside window");
        assert!(matches!(err, PolicyError::NotInWindow { .. }));

        // Landing late in the next window is still aligned to its start.
        let next = timing
            .check(midnight + DAY + 8_000, last)
            .expect("next window");
        assert_eq!(next, midnight + DAY + 7_200);
    }

    #[test]
    fn test_window_clipped_at_interval_end() {
        let timing = RebaseTiming::new(DAY, 0, u64::MAX).expect("timing");
        assert!(timing.in_window(DAY - 1));
        assert!(timing.in_window(DAY));
    }
}
