//! Queue configuration.

use std::time::Duration;

/// Tuning knobs for a `TaskQueue`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Longest the idle worker waits before re-checking the stop signal.
    pub poll_interval: Duration,
    /// How long terminal task states are kept. `None` keeps them forever.
    pub retention: Option<Duration>,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(1),
            retention: None,
        }
    }
}

impl QueueConfig {
    /// Sets the idle poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Enables eviction of terminal states older than `retention`.
    #[must_use]
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = Some(retention);
        self
    }
}
