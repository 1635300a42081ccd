use std::time::Duration;

/// Exponential backoff between attempts to replace a lost connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub enabled: bool,
    pub initial_backoff: Duration,
    pub max_backoff: Duration,
    /// `None` keeps retrying forever.
    pub max_attempts: Option<u32>,
}

impl ReconnectPolicy {
    /// Delay before reconnect attempt `attempt` (1-based), or `None` when the
    /// policy gives up.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if !self.enabled || attempt == 0 {
            return None;
        }

        if self.max_attempts.is_some_and(|max| attempt > max) {
            return None;
        }

        let base_ms = u64::try_from(self.initial_backoff.as_millis()).unwrap_or(u64::MAX);
        let factor = 1_u64.checked_shl(attempt - 1).unwrap_or(u64::MAX);
        let backoff = Duration::from_millis(base_ms.saturating_mul(factor));

        Some(backoff.min(self.max_backoff))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_attempts: Option<u32>) -> ReconnectPolicy {
        ReconnectPolicy {
            enabled: true,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            max_attempts,
        }
    }

    #[test]
    fn delays_double_until_capped() {
        let policy = policy(None);

        assert_eq!(policy.delay_for(1), Some(Duration::from_millis(500)));
        assert_eq!(policy.delay_for(2), Some(Duration::from_secs(1)));
        assert_eq!(policy.delay_for(4), Some(Duration::from_secs(4)));
        assert_eq!(policy.delay_for(7), Some(Duration::from_secs(30)));
        assert_eq!(policy.delay_for(200), Some(Duration::from_secs(30)));
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let policy = policy(Some(2));

        assert!(policy.delay_for(2).is_some());
        assert_eq!(policy.delay_for(3), None);
    }

    #[test]
    fn disabled_policy_never_retries() {
        let mut policy = policy(None);
        policy.enabled = false;

        assert_eq!(policy.delay_for(1), None);
    }
}
