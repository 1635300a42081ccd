use std::time::{Duration, Instant};

/// Leading-edge throttle: the first call fires, later calls are dropped until
/// `interval` has passed since the last one that fired.
#[derive(Debug, Clone)]
pub struct LeadingThrottle {
    interval: Duration,
    last_fired: Option<Instant>,
}

impl LeadingThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_fired: None,
        }
    }

    pub fn try_fire(&mut self, now: Instant) -> bool {
        let ready = match self.last_fired {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        };

        if ready {
            self.last_fired = Some(now);
        }

        ready
    }

    pub fn reset(&mut self) {
        self.last_fired = None;
    }
}
