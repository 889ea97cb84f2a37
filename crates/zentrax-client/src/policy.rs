//! Reconnect backoff.

use std::time::Duration;

/// Linear backoff with a ceiling and a bounded number of attempts.
///
/// The delay before attempt `n` is `min(base * n, max)`. The counter resets when a
/// connection opens; once it reaches `max_attempts` no further retry is offered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPolicy {
    attempt: u32,
    max_attempts: u32,
    base_delay: Duration,
    max_delay: Duration,
}

impl ReconnectPolicy {
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;
    pub const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(3000);
    pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(15000);

    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            attempt: 0,
            max_attempts,
            base_delay,
            max_delay,
        }
    }

    /// Delay before the given attempt.
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt).min(self.max_delay)
    }

    /// Claim the next attempt, returning how long to wait before it.
    ///
    /// Returns `None` once the attempts are used up.
    pub fn next_retry(&mut self) -> Option<Duration> {
        if self.is_exhausted() {
            return None;
        }
        self.attempt += 1;
        Some(self.delay(self.attempt))
    }

    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn is_exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_MAX_ATTEMPTS,
            Self::DEFAULT_BASE_DELAY,
            Self::DEFAULT_MAX_DELAY,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_is_linear_then_capped() {
        let policy = ReconnectPolicy::default();
        assert_eq!(policy.delay(1), Duration::from_secs(3));
        assert_eq!(policy.delay(4), Duration::from_secs(12));
        assert_eq!(policy.delay(5), Duration::from_secs(15));
        assert_eq!(policy.delay(10), Duration::from_secs(15));
    }

    #[test]
    fn delay_never_decreases() {
        let policy = ReconnectPolicy::default();
        for a in 1..policy.max_attempts() {
            let d = policy.delay(a);
            assert_eq!(d, (Duration::from_millis(3000) * a).min(Duration::from_millis(15000)));
            assert!(policy.delay(a + 1) >= d);
        }
    }

    #[test]
    fn attempts_run_out() {
        let mut policy = ReconnectPolicy::new(3, Duration::from_millis(100), Duration::from_secs(1));
        assert_eq!(policy.next_retry(), Some(Duration::from_millis(100)));
        assert_eq!(policy.next_retry(), Some(Duration::from_millis(200)));
        assert_eq!(policy.next_retry(), Some(Duration::from_millis(300)));
        assert_eq!(policy.next_retry(), None);
        assert!(policy.is_exhausted());
        assert_eq!(policy.attempt(), 3);

        policy.reset();
        assert_eq!(policy.attempt(), 0);
        assert_eq!(policy.next_retry(), Some(Duration::from_millis(100)));
    }
}
