use std::time::Duration;

/// Longest delay the schedule is allowed to grow to unless the call site
/// raises it explicitly.
const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(900);

/// Delay between polls when the call site does not care.
const DEFAULT_DELAY: Duration = Duration::from_secs(5);

/// Retry budget and delay schedule for one call site.
///
/// Built once per call site and never mutated afterwards; the loop derives
/// everything it needs (`delay_for`) as pure functions of the policy.
///
/// `max_attempts` is the total number of invocations of the operation,
/// including the initial try: `attempts(1)` means exactly one try and no
/// sleeps. Attempt indices are 0-based everywhere.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    max_attempts: Option<u32>,
    timeout: Option<Duration>,
    delay: Duration,
    backoff: f64,
    max_delay: Duration,
}

impl RetryPolicy {
    /// A budget of `n` total invocations.
    pub fn attempts(n: u32) -> Self {
        Self::base().with_attempts(n)
    }

    /// A wall-clock budget measured from loop start.
    pub fn timeout(t: Duration) -> Self {
        Self::base().with_timeout(t)
    }

    fn base() -> Self {
        Self {
            max_attempts: None,
            timeout: None,
            delay: DEFAULT_DELAY,
            backoff: 1.0,
            max_delay: DEFAULT_MAX_DELAY,
        }
    }

    pub fn with_attempts(mut self, n: u32) -> Self {
        assert!(n >= 1, "retry budget must allow at least one attempt");
        self.max_attempts = Some(n);
        self
    }

    pub fn with_timeout(mut self, t: Duration) -> Self {
        self.timeout = Some(t);
        self
    }

    /// Base delay between attempts. Zero is allowed.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Multiplier applied to the delay after every failed attempt.
    /// `1.0` keeps the delay constant; larger values accommodate slow
    /// daemon restarts without hammering the cluster early on.
    pub fn with_backoff(mut self, backoff: f64) -> Self {
        assert!(backoff >= 1.0, "backoff must not shrink the delay");
        self.backoff = backoff;
        self
    }

    /// Cap on the delay schedule, grown or not.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Total invocations allowed, if bounded by count.
    pub fn max_attempts(&self) -> Option<u32> {
        self.max_attempts
    }

    /// Wall-clock budget measured from loop start, if bounded by time.
    pub fn deadline(&self) -> Option<Duration> {
        self.timeout
    }

    /// Delay to sleep after attempt `index` has failed.
    pub fn delay_for(&self, index: u32) -> Duration {
        let delay = if self.backoff > 1.0 {
            let grown = self.delay.as_secs_f64() * self.backoff.powi(index as i32);
            if grown >= self.max_delay.as_secs_f64() {
                self.max_delay
            } else {
                Duration::from_secs_f64(grown)
            }
        } else {
            self.delay
        };

        delay.min(self.max_delay)
    }
}
