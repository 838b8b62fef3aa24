use rand::Rng;
use std::time::Duration;

const MIN_BACKOFF: Duration = Duration::from_millis(500);
const MAX_BACKOFF: Duration = Duration::from_secs(30);
const BACKOFF_MULTIPLIER: f64 = 2.0;
const JITTER_RANGE: f64 = 0.1; // 10% jitter

/// Reconnect delay that doubles per failed attempt, with jitter.
#[derive(Debug, Clone)]
pub struct Backoff {
    pub attempt_count: u32,
    pub next_attempt_after: Duration,
}

impl Backoff {
    pub fn new() -> Self {
        Self {
            attempt_count: 0,
            next_attempt_after: MIN_BACKOFF,
        }
    }

    /// Records a failed attempt and returns how long to wait before the next one.
    pub fn record_attempt(&mut self) -> Duration {
        self.attempt_count = self.attempt_count.saturating_add(1);

        let exponent = (self.attempt_count - 1).min(16) as i32;
        let base_backoff = MIN_BACKOFF.as_secs_f64() * BACKOFF_MULTIPLIER.powi(exponent);
        let clamped_backoff = base_backoff.min(MAX_BACKOFF.as_secs_f64());

        let mut rng = rand::thread_rng();
        let jitter_factor = 1.0 + rng.gen_range(-JITTER_RANGE..JITTER_RANGE);

        self.next_attempt_after = Duration::from_secs_f64(clamped_backoff * jitter_factor);
        self.next_attempt_after
    }

    pub fn record_success(&mut self) {
        self.attempt_count = 0;
        self.next_attempt_after = MIN_BACKOFF;
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self::new()
    }
}
