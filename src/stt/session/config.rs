use std::time::Duration;

/// Tuning knobs for a recognition [`Session`](super::Session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// How long a single recognition attempt may wait for speech before it counts as "nothing
    /// recognized" and is retried.
    pub attempt_timeout: Duration,
    /// How long the async session yields between attempts that recognized nothing.
    pub poll_interval: Duration,
}

impl SessionConfig {
    /// Sets the per-attempt timeout.
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Sets the pause between attempts of the async session.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            attempt_timeout: Duration::from_secs(10),
            poll_interval: Duration::from_millis(50),
        }
    }
}
