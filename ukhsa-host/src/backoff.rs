//! Retry delays for tracker setup.

use std::time::Duration;

use crate::config::RetryConfig;

/// Doubling delay between setup attempts, capped at a maximum.
#[derive(Debug, Clone)]
pub struct SetupBackoff {
    max: Duration,
    current: Duration,
}

impl SetupBackoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        let initial = initial.max(Duration::from_secs(1));
        let max = max.max(initial);
        Self {
            max,
            current: initial,
        }
    }

    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            Duration::from_secs(config.initial_secs),
            Duration::from_secs(config.max_secs),
        )
    }

    /// Record a failed attempt and return how long to wait before the next.
    pub fn mark_failure(&mut self) -> Duration {
        let delay = self.current;
        self.current = self.current.saturating_mul(2).min(self.max);
        delay
    }
}
