use std::time::{Duration, Instant};

const ONE_SECOND: Duration = Duration::from_secs(1);

/// What a countdown reports when a second passes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerSignal {
    /// Carries the seconds still left
    Tick(u32),
    Expired,
}

/// Once-per-second countdown for a typing session.
///
/// The countdown is deadline based: `poll` emits one signal per whole second
/// that has passed, so callers can poll as often as they like.
#[derive(Debug, Clone, Default)]
pub struct SessionTimer {
    remaining: u32,
    next_deadline: Option<Instant>,
}

impl SessionTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancels whatever was running and counts down from `limit_secs`
    pub fn start(&mut self, limit_secs: u32, now: Instant) {
        self.cancel();
        self.remaining = limit_secs;
        self.next_deadline = Some(now + ONE_SECOND);
    }

    pub fn cancel(&mut self) {
        self.next_deadline = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_deadline.is_some()
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Advance one second. Yields nothing once stopped.
    pub fn tick(&mut self) -> Option<TimerSignal> {
        let deadline = self.next_deadline?;
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.next_deadline = None;
            Some(TimerSignal::Expired)
        } else {
            self.next_deadline = Some(deadline + ONE_SECOND);
            Some(TimerSignal::Tick(self.remaining))
        }
    }

    /// Signals for every second elapsed up to `now`, oldest first
    pub fn poll(&mut self, now: Instant) -> Vec<TimerSignal> {
        let mut signals = Vec::new();
        while let Some(deadline) = self.next_deadline {
            if now < deadline {
                break;
            }
            if let Some(signal) = self.tick() {
                signals.push(signal);
            }
        }
        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_timer_is_idle() {
        let mut timer = SessionTimer::new();
        assert!(!timer.is_running());
        assert_eq!(timer.tick(), None);
        assert!(timer.poll(Instant::now()).is_empty());
    }

    #[test]
    fn tick_counts_down_then_expires_once() {
        let mut timer = SessionTimer::new();
        timer.start(3, Instant::now());

        assert_eq!(timer.tick(), Some(TimerSignal::Tick(2)));
        assert_eq!(timer.tick(), Some(TimerSignal::Tick(1)));
        assert_eq!(timer.tick(), Some(TimerSignal::Expired));
        assert!(!timer.is_running());
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining(), 0);
    }

    #[test]
    fn zero_limit_expires_on_first_tick() {
        let mut timer = SessionTimer::new();
        timer.start(0, Instant::now());
        assert_eq!(timer.tick(), Some(TimerSignal::Expired));
    }

    #[test]
    fn poll_waits_for_whole_seconds() {
        let start = Instant::now();
        let mut timer = SessionTimer::new();
        timer.start(30, start);

        assert!(timer.poll(start + Duration::from_millis(999)).is_empty());
        assert_eq!(
            timer.poll(start + Duration::from_millis(1000)),
            vec![TimerSignal::Tick(29)]
        );
        assert!(timer.poll(start + Duration::from_millis(1500)).is_empty());
    }

    #[test]
    fn poll_catches_up_on_missed_seconds() {
        let start = Instant::now();
        let mut timer = SessionTimer::new();
        timer.start(5, start);

        let signals = timer.poll(start + Duration::from_millis(3200));
        assert_eq!(
            signals,
            vec![
                TimerSignal::Tick(4),
                TimerSignal::Tick(3),
                TimerSignal::Tick(2)
            ]
        );
        assert_eq!(timer.remaining(), 2);
    }

    #[test]
    fn poll_stops_after_expiry() {
        let start = Instant::now();
        let mut timer = SessionTimer::new();
        timer.start(2, start);

        let signals = timer.poll(start + Duration::from_secs(10));
        assert_eq!(signals, vec![TimerSignal::Tick(1), TimerSignal::Expired]);
        assert!(timer.poll(start + Duration::from_secs(20)).is_empty());
    }

    #[test]
    fn cancel_is_idempotent() {
        let mut timer = SessionTimer::new();
        timer.cancel();
        timer.start(10, Instant::now());
        timer.cancel();
        timer.cancel();
        assert!(!timer.is_running());
        assert_eq!(timer.tick(), None);
    }

    #[test]
    fn restart_resets_remaining() {
        let start = Instant::now();
        let mut timer = SessionTimer::new();
        timer.start(10, start);
        timer.poll(start + Duration::from_secs(4));
        assert_eq!(timer.remaining(), 6);

        let later = start + Duration::from_secs(4);
        timer.start(10, later);
        assert_eq!(timer.remaining(), 10);
        assert!(timer.poll(later + Duration::from_millis(500)).is_empty());
    }
}
