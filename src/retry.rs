//! Transport-level retries.
//!
//! Only a failed connection is retried. At that point nothing has reached the server, so
//! sending again cannot duplicate a publish. Timeouts and faults after the request went
//! out are reported at once, as are HTTP errors and undecodable bodies.

use std::time::Duration;

/// Retries used when the builder is given no strategy.
pub const DEFAULT_MAX_RETRIES: usize = 2;

/// How often, and after what pause, a failed connection is attempted again.
///
/// # Examples
///
/// ```
/// use fbgraph::RetryStrategy;
/// use std::time::Duration;
///
/// let never = RetryStrategy::None;
/// assert_eq!(never.delay_for_attempt(1), None);
///
/// let patient = RetryStrategy::Linear {
///     delay: Duration::from_secs(1),
///     max_retries: 3,
/// };
/// assert_eq!(patient.delay_for_attempt(3), Some(Duration::from_secs(1)));
///
/// assert_eq!(RetryStrategy::default().max_retries(), Some(2));
/// ```
#[derive(Debug, Clone)]
pub enum RetryStrategy {
    /// Report the first failure.
    None,

    /// Up to `max_retries` further attempts, `delay` apart.
    Linear {
        /// Pause before each retry.
        delay: Duration,
        /// Retry count, not counting the first attempt.
        max_retries: usize,
    },

    /// `delay_fn(n)` gives the pause before retry `n` (from 1); `None` ends the loop.
    Custom {
        /// Pause schedule.
        delay_fn: fn(attempt: usize) -> Option<Duration>,
    },
}

impl Default for RetryStrategy {
    fn default() -> Self {
        RetryStrategy::Linear {
            delay: Duration::ZERO,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

impl RetryStrategy {
    /// The pause before retry `attempt` (1 is the first retry), or `None` once exhausted.
    pub fn delay_for_attempt(&self, attempt: usize) -> Option<Duration> {
        match self {
            RetryStrategy::None => None,
            RetryStrategy::Linear { delay, max_retries } => {
                (attempt <= *max_retries).then_some(*delay)
            }
            RetryStrategy::Custom { delay_fn } => delay_fn(attempt),
        }
    }

    /// The retry ceiling; unknown for [`RetryStrategy::Custom`].
    pub fn max_retries(&self) -> Option<usize> {
        match self {
            RetryStrategy::None => Some(0),
            RetryStrategy::Linear { max_retries, .. } => Some(*max_retries),
            RetryStrategy::Custom { .. } => None,
        }
    }
}

/// Whether `error` happened before any bytes of the request reached the server.
pub(crate) fn is_transient(error: &reqwest::Error) -> bool {
    error.is_connect() && !error.is_builder()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_two_immediate_retries() {
        let strategy = RetryStrategy::default();

        assert_eq!(strategy.delay_for_attempt(1), Some(Duration::ZERO));
        assert_eq!(strategy.delay_for_attempt(2), Some(Duration::ZERO));
        assert_eq!(strategy.delay_for_attempt(3), None);
    }

    #[test]
    fn test_linear_delays() {
        let strategy = RetryStrategy::Linear {
            delay: Duration::from_secs(1),
            max_retries: 3,
        };

        assert_eq!(strategy.delay_for_attempt(1), Some(Duration::from_secs(1)));
        assert_eq!(strategy.delay_for_attempt(3), Some(Duration::from_secs(1)));
        assert_eq!(strategy.delay_for_attempt(4), None);
        assert_eq!(strategy.max_retries(), Some(3));
    }

    #[test]
    fn test_no_retry() {
        let strategy = RetryStrategy::None;
        assert_eq!(strategy.delay_for_attempt(1), None);
        assert_eq!(strategy.max_retries(), Some(0));
    }

    #[test]
    fn test_custom_delays() {
        fn ramp_then_stop(attempt: usize) -> Option<Duration> {
            (attempt < 3).then(|| Duration::from_millis(attempt as u64 * 10))
        }
        let strategy = RetryStrategy::Custom {
            delay_fn: ramp_then_stop,
        };

        assert_eq!(strategy.delay_for_attempt(2), Some(Duration::from_millis(20)));
        assert_eq!(strategy.delay_for_attempt(3), None);
        assert_eq!(strategy.max_retries(), None);
    }
}
