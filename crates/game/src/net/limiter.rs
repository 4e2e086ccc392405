use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const DEFAULT_RATE_LIMIT: usize = 18;
pub const DEFAULT_RATE_WINDOW: Duration = Duration::from_millis(2000);

/// Allows at most `max_sends` sends inside any trailing `window`.
#[derive(Debug, Clone)]
pub struct SlidingWindowLimiter {
    window: Duration,
    max_sends: usize,
    sent: VecDeque<Instant>,
}

impl Default for SlidingWindowLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_RATE_LIMIT, DEFAULT_RATE_WINDOW)
    }
}

impl SlidingWindowLimiter {
    pub fn new(max_sends: usize, window: Duration) -> Self {
        Self {
            window,
            max_sends,
            sent: VecDeque::with_capacity(max_sends),
        }
    }

    fn expire(&mut self, now: Instant) {
        while let Some(oldest) = self.sent.front() {
            if now.saturating_duration_since(*oldest) >= self.window {
                self.sent.pop_front();
            } else {
                break;
            }
        }
    }

    pub fn try_acquire_at(&mut self, now: Instant) -> bool {
        self.expire(now);
        if self.sent.len() >= self.max_sends {
            return false;
        }
        self.sent.push_back(now);
        true
    }
}
