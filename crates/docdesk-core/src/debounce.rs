use std::time::{Duration, Instant};

/// Trailing-edge debounce driven by explicit clock readings.
///
/// Every `trigger` pushes the deadline out to `now + delay`; `poll` fires once
/// the deadline has passed and then disarms until the next trigger.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            deadline: None,
        }
    }

    pub fn trigger(&mut self, now: Instant) {
        self.deadline = Some(now + self.delay);
    }

    /// Returns `true` exactly once per quiet period.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn cancel(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = Duration::from_millis(300);

    #[test]
    fn test_burst_fires_at_most_once() {
        let start = Instant::now();
        let mut d = Debouncer::new(DELAY);
        let mut fired = 0;

        // 5 keystrokes, 50ms apart (all within 300ms)
        for i in 0..5 {
            let now = start + Duration::from_millis(i * 50);
            d.trigger(now);
            if d.poll(now) {
                fired += 1;
            }
        }
        // Poll every 10ms for a second
        for ms in (200..1200).step_by(10) {
            if d.poll(start + Duration::from_millis(ms)) {
                fired += 1;
            }
        }
        assert_eq!(fired, 1);
    }

    #[test]
    fn test_fires_after_quiet_period_from_last_trigger() {
        let start = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.trigger(start);
        d.trigger(start + Duration::from_millis(250));

        // 300ms after the first trigger but only 50ms after the last
        assert!(!d.poll(start + Duration::from_millis(300)));
        assert!(d.is_pending());
        assert!(d.poll(start + Duration::from_millis(550)));
        assert!(!d.is_pending());
    }

    #[test]
    fn test_no_trigger_never_fires() {
        let mut d = Debouncer::new(DELAY);
        assert!(!d.poll(Instant::now() + Duration::from_secs(10)));
    }

    #[test]
    fn test_cancel() {
        let start = Instant::now();
        let mut d = Debouncer::new(DELAY);
        d.trigger(start);
        d.cancel();
        assert!(!d.poll(start + Duration::from_secs(1)));
    }
}
