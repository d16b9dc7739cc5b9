//! Clock abstraction for deterministic timestamps.

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};

/// Abstraction over system time so task timestamps can be pinned in tests.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the instant lying `window` before now. Windows too large to
    /// represent saturate at the earliest representable instant.
    fn cutoff(&self, window: Duration) -> DateTime<Utc> {
        TimeDelta::from_std(window)
            .ok()
            .and_then(|delta| self.now().checked_sub_signed(delta))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Production clock that delegates to the system clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    struct Pinned(DateTime<Utc>);

    impl Clock for Pinned {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[test]
    fn test_cutoff_subtracts_window_from_now() {
        let now = Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap();
        let clock = Pinned(now);

        let cutoff = clock.cutoff(Duration::from_secs(3600));

        assert_eq!(cutoff, Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_cutoff_saturates_for_huge_windows() {
        let clock = Pinned(Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap());

        let cutoff = clock.cutoff(Duration::from_secs(u64::MAX));

        assert_eq!(cutoff, DateTime::<Utc>::MIN_UTC);
    }
}
